//! Permission types: mode bits and the owner/group/other classes.

use std::fmt;

/// One of the three POSIX permission classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionClass {
    /// The file's owner (`u`).
    Owner,
    /// The file's group (`g`).
    Group,
    /// Everyone else (`o`).
    Other,
}

/// Read/write/execute bits belonging to one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClassBits {
    read: u32,
    write: u32,
    execute: u32,
}

// Explicit per-class lookup. Nothing here assumes the read bit sits next to
// the write bit.
const OWNER_BITS: ClassBits = ClassBits {
    read: 0o400,
    write: 0o200,
    execute: 0o100,
};
const GROUP_BITS: ClassBits = ClassBits {
    read: 0o040,
    write: 0o020,
    execute: 0o010,
};
const OTHER_BITS: ClassBits = ClassBits {
    read: 0o004,
    write: 0o002,
    execute: 0o001,
};

impl PermissionClass {
    /// All classes, in `ugo` order.
    pub const ALL: [PermissionClass; 3] = [
        PermissionClass::Owner,
        PermissionClass::Group,
        PermissionClass::Other,
    ];

    const fn bits(self) -> ClassBits {
        match self {
            PermissionClass::Owner => OWNER_BITS,
            PermissionClass::Group => GROUP_BITS,
            PermissionClass::Other => OTHER_BITS,
        }
    }

    /// The read bit of this class.
    #[inline]
    pub const fn read_bit(self) -> u32 {
        self.bits().read
    }

    /// The write bit of this class.
    #[inline]
    pub const fn write_bit(self) -> u32 {
        self.bits().write
    }

    /// The execute bit of this class.
    #[inline]
    pub const fn execute_bit(self) -> u32 {
        self.bits().execute
    }
}

/// Write bits of every class.
pub const ALL_CAN_WRITE: u32 = OWNER_BITS.write | GROUP_BITS.write | OTHER_BITS.write;

/// Read bits of every class.
pub const ALL_CAN_READ: u32 = OWNER_BITS.read | GROUP_BITS.read | OTHER_BITS.read;

/// Unix permission bits of a filesystem entry (`rwxrwxrwx` plus
/// setuid/setgid/sticky).
///
/// File type bits are stripped on construction, so two modes compare equal
/// whenever their permissions do.
///
/// # Examples
///
/// ```rust
/// use niconv_utils::FileMode;
///
/// let mode = FileMode::from_mode(0o100644);
/// assert_eq!(mode.mode(), 0o644);
/// assert_eq!(mode.read_only().mode(), 0o444);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    /// Create a mode from raw `st_mode` bits (e.g., `0o644`). File type bits
    /// are discarded.
    #[inline]
    pub const fn from_mode(mode: u32) -> Self {
        Self(mode & 0o7777)
    }

    /// Get the raw permission bits.
    #[inline]
    pub const fn mode(&self) -> u32 {
        self.0
    }

    /// Returns `true` if `class` may read.
    #[inline]
    pub const fn can_read(&self, class: PermissionClass) -> bool {
        self.0 & class.read_bit() != 0
    }

    /// Returns `true` if `class` may write.
    #[inline]
    pub const fn can_write(&self, class: PermissionClass) -> bool {
        self.0 & class.write_bit() != 0
    }

    /// Returns `true` if `class` may execute.
    #[inline]
    pub const fn can_execute(&self, class: PermissionClass) -> bool {
        self.0 & class.execute_bit() != 0
    }

    /// Returns `true` if no class may write.
    #[inline]
    pub const fn is_read_only(&self) -> bool {
        self.0 & ALL_CAN_WRITE == 0
    }

    /// The same mode with every write bit cleared.
    #[inline]
    pub const fn read_only(self) -> Self {
        Self(self.0 & !ALL_CAN_WRITE)
    }

    /// The same mode with write granted to each class that can read.
    ///
    /// Classes without read permission are left as they are. Execute and
    /// special bits are never touched.
    ///
    /// ```rust
    /// use niconv_utils::FileMode;
    ///
    /// assert_eq!(FileMode::from_mode(0o400).writable_where_readable().mode(), 0o600);
    /// assert_eq!(FileMode::from_mode(0o750).writable_where_readable().mode(), 0o770);
    /// assert_eq!(FileMode::from_mode(0o111).writable_where_readable().mode(), 0o111);
    /// ```
    pub fn writable_where_readable(self) -> Self {
        let granted = PermissionClass::ALL
            .iter()
            .filter(|class| self.can_read(**class))
            .fold(0, |acc, class| acc | class.write_bit());
        Self(self.0 | granted)
    }

    /// Classes that can read but cannot write.
    ///
    /// Empty after [`writable_where_readable`](Self::writable_where_readable).
    pub fn readable_without_write(&self) -> Vec<PermissionClass> {
        PermissionClass::ALL
            .into_iter()
            .filter(|class| self.can_read(*class) && !self.can_write(*class))
            .collect()
    }
}

impl Default for FileMode {
    /// `0o644`, the mode a new data file normally gets.
    fn default() -> Self {
        Self(0o644)
    }
}

impl fmt::Display for FileMode {
    /// Renders as `ls`-style `rwxr-xr-x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in PermissionClass::ALL {
            let r = if self.can_read(class) { 'r' } else { '-' };
            let w = if self.can_write(class) { 'w' } else { '-' };
            let x = if self.can_execute(class) { 'x' } else { '-' };
            write!(f, "{r}{w}{x}")?;
        }
        Ok(())
    }
}

impl fmt::Octal for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}

/// Options that control which attributes are copied onto a stored file.
///
/// Everything is preserved by default: a backup copy should carry the same
/// owner, group, mode and timestamps as its source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MetadataOptions {
    preserve_owner: bool,
    preserve_group: bool,
    preserve_permissions: bool,
    preserve_times: bool,
}

impl MetadataOptions {
    /// Creates a new [`MetadataOptions`] value preserving every attribute.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            preserve_owner: true,
            preserve_group: true,
            preserve_permissions: true,
            preserve_times: true,
        }
    }

    /// Requests that the owning user be preserved.
    #[must_use]
    pub const fn preserve_owner(mut self, preserve: bool) -> Self {
        self.preserve_owner = preserve;
        self
    }

    /// Requests that the owning group be preserved.
    #[must_use]
    pub const fn preserve_group(mut self, preserve: bool) -> Self {
        self.preserve_group = preserve;
        self
    }

    /// Requests that permission bits be preserved.
    #[must_use]
    pub const fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Requests that access and modification times be preserved.
    #[must_use]
    pub const fn preserve_times(mut self, preserve: bool) -> Self {
        self.preserve_times = preserve;
        self
    }

    /// Reports whether the owning user is preserved.
    #[must_use]
    pub const fn owner(&self) -> bool {
        self.preserve_owner
    }

    /// Reports whether the owning group is preserved.
    #[must_use]
    pub const fn group(&self) -> bool {
        self.preserve_group
    }

    /// Reports whether permission bits are preserved.
    #[must_use]
    pub const fn permissions(&self) -> bool {
        self.preserve_permissions
    }

    /// Reports whether timestamps are preserved.
    #[must_use]
    pub const fn times(&self) -> bool {
        self.preserve_times
    }
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self::new()
    }
}

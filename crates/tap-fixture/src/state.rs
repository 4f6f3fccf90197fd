//! Install state of the fixture's package

use crate::runner::Verify;

/// Whether this fixture has installed its package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstallState {
    #[default]
    NotInstalled,
    Installed,
}

impl InstallState {
    pub fn is_installed(self) -> bool {
        self == Self::Installed
    }

    /// Uninstall is only verified when this fixture knows it installed the
    /// package. Otherwise the package may or may not be present.
    pub fn uninstall_verify(self) -> Verify {
        Verify::strict_if(self.is_installed())
    }
}

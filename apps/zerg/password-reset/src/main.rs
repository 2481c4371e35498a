//! Password Reset Demo Entry Point

use core_config::tracing::install_color_eyre;
use eyre::Result;

fn main() -> Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    zerg_password_reset::run()
}

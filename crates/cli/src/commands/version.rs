//! `learner-recover version`: prints the crate version and the build's
//! git commit, when available. No config, no I/O beyond stdout.

use anyhow::Result;

pub fn run() -> Result<()> {
    println!("learner-recover {}", env!("CARGO_PKG_VERSION"));
    println!("commit: {}", env!("BUILD_GIT_HASH"));
    Ok(())
}

// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "matchday-controller")]
pub struct Args {
    /// Specify path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Parses the CLI-Arguments into [`Args`]
pub fn parse_args() -> Args {
    Args::parse()
}

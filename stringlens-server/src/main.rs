// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! `stringlens-server` binary
//!
//! Settings are resolved in order: defaults, then the TOML file given with
//! `--config`, then `STRINGLENS_*` environment variables, then the flags below.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use stringlens_server::{config::ServerConfig, run_server};

/// Analyze, store and search strings over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server configuration file (TOML with [server] and [storage] tables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address the HTTP API binds to
    #[arg(long, env = "STRINGLENS_HTTP_ADDR")]
    http_addr: Option<String>,

    /// Directory holding records.json and records.journal
    #[arg(long, env = "STRINGLENS_DATA_DIR", conflicts_with = "in_memory")]
    data_dir: Option<PathBuf>,

    /// Do not read or write the data directory; records are lost on exit
    #[arg(long)]
    in_memory: bool,

    /// Longest natural-language search query accepted, in bytes
    #[arg(long, env = "STRINGLENS_MAX_QUERY_LENGTH")]
    max_query_length: Option<usize>,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(addr) = self.http_addr {
            config.server.listen_addr = addr;
        }
        if let Some(data_dir) = self.data_dir {
            config.storage.data_dir = data_dir;
        }
        if self.in_memory {
            config.storage.persist = false;
        }
        if let Some(max_query_length) = self.max_query_length {
            config.server.max_query_length = max_query_length;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(args.config.clone())?;
    run_server(args.apply(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> clap::error::Result<Args> {
        let mut argv = vec!["stringlens-server"];
        argv.extend_from_slice(flags);
        Args::try_parse_from(argv)
    }

    #[test]
    fn test_flags_override_config() {
        let flags = [
            "--http-addr",
            "0.0.0.0:9100",
            "--max-query-length",
            "64",
        ];

        let config = parse(&flags).unwrap().apply(ServerConfig::default());
        assert_eq!(config.server.listen_addr, "0.0.0.0:9100");
        assert_eq!(config.server.max_query_length, 64);
        assert!(config.storage.persist);
    }

    #[test]
    fn test_in_memory_disables_persistence() {
        let args = parse(&["--in-memory"]).unwrap();
        assert!(!args.apply(ServerConfig::default()).storage.persist);

        let conflicting = parse(&["--in-memory", "--data-dir", "/tmp/records"]);
        assert!(conflicting.is_err());
    }
}

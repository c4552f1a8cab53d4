// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Log setup for the command-line tool.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed.  `RUST_LOG`, when set, overrides the level
//! passed in here.

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber.  Returns `false` if a global subscriber
/// was already set, which is harmless.
pub fn init_logging(log_level: &str, json_format: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let result = if json_format {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if result.is_ok() {
        info!(
            "Logging initialized: level={}, format={}",
            log_level,
            if json_format { "json" } else { "text" }
        );
    }
    result.is_ok()
}

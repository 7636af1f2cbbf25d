// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

pub const CARGO_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The revision the binary was built from, injected by CI through `GIT_SHA`.
pub const VERSION: &str = match option_env!("GIT_SHA") {
    Some(sha) => sha,
    None => "development",
};

// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026 Datadog, Inc.

pub mod diff;
pub mod languages;
pub mod lines;
pub mod locate;
pub mod plan;
pub mod rewrite;
pub mod transform;
pub mod tree_sitter;

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod logging;
mod vendor;

pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use vendor::{BlackListConfig, JwtConfig, VendorConfig};

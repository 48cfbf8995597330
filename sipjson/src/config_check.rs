// SPDX-License-Identifier: Apache-2.0

//! Compile-time configuration validation
//!
//! Integer width and decimal handling are selected with cargo features;
//! the checks below reject combinations that would leave `Scalar` without
//! a single well-defined shape.

// If none were selected that's an error
#[cfg(not(any(feature = "int32", feature = "int64")))]
compile_error!("No integer width features selected: choose one of 'int32' or 'int64'");

#[cfg(all(feature = "int32", feature = "int64"))]
compile_error!(
    "Cannot enable both 'int32' and 'int64' features simultaneously: choose one integer width"
);

#[cfg(all(feature = "float", feature = "float-truncate"))]
compile_error!("Cannot enable both 'float' and 'float-truncate' features: 'float-truncate' is only for when float decoding is disabled");

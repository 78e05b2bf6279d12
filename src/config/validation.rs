//! Config validation that reports every problem at once.
//!
//! Each rule yields a stillwater `Validation`; [`combine_validations`] gathers
//! the failures so a user fixing their file sees the whole list in one run.

use std::path::Path;

use stillwater::{NonEmptyVec, Validation};

use super::core::ReportConfig;
use crate::core::errors::{Error, Result};

pub type ConfigValidation<T> = Validation<T, NonEmptyVec<String>>;

fn check(ok: bool, message: &str) -> ConfigValidation<()> {
    if ok {
        Validation::Success(())
    } else {
        Validation::Failure(NonEmptyVec::new(message.to_string(), Vec::new()))
    }
}

fn is_blank_path(path: &Path) -> bool {
    path.to_string_lossy().trim().is_empty()
}

/// Merge validations, keeping every failure in order.
pub fn combine_validations(validations: Vec<ConfigValidation<()>>) -> ConfigValidation<()> {
    let failures: Vec<String> = validations
        .into_iter()
        .flat_map(|v| match v {
            Validation::Success(()) => Vec::new(),
            Validation::Failure(errors) => errors.into_vec(),
        })
        .collect();

    match NonEmptyVec::from_vec(failures) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(()),
    }
}

pub fn validate_config(config: &ReportConfig) -> ConfigValidation<()> {
    combine_validations(vec![
        check(!config.owner.trim().is_empty(), "owner cannot be empty"),
        check(config.project_number > 0, "project_number must be positive"),
        check(
            !is_blank_path(&config.output_directory),
            "output_directory cannot be empty",
        ),
        check(
            !is_blank_path(&config.snapshot_directory),
            "snapshot_directory cannot be empty",
        ),
        check(config.item_limit > 0, "item_limit must be positive"),
    ])
}

/// Fail-fast wrapper returning the accumulated messages as [`Error::Config`].
pub fn validate_config_result(config: &ReportConfig) -> Result<()> {
    match validate_config(config) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => Err(Error::Config(errors.into_vec())),
    }
}

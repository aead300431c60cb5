//! Client-side parameter validation.
//!
//! Mirrors the bounds a text-generation server enforces so invalid requests fail
//! before touching the network. Open intervals exclude both ends; NaN never passes.

use super::parameters::GenerationParameters;
use crate::{Error, Result};

fn check_positive(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !(v > 0.0) => Err(Error::invalid_parameter(
            field,
            format!("must be strictly positive, got {}", v),
        )),
        _ => Ok(()),
    }
}

fn check_nonzero(field: &str, value: Option<u32>) -> Result<()> {
    match value {
        Some(0) => Err(Error::invalid_parameter(field, "must be strictly positive, got 0")),
        _ => Ok(()),
    }
}

fn check_open_unit(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !(v > 0.0 && v < 1.0) => Err(Error::invalid_parameter(
            field,
            format!("must be > 0.0 and < 1.0, got {}", v),
        )),
        _ => Ok(()),
    }
}

/// Check every numeric bound and cross-field rule of a parameter set.
///
/// `seed` has no runtime check: its type already rules out negative values.
pub fn validate_parameters(parameters: &GenerationParameters) -> Result<()> {
    if let Some(best_of) = parameters.best_of {
        if best_of == 0 {
            return Err(Error::invalid_parameter(
                "best_of",
                "must be strictly positive, got 0",
            ));
        }
        if best_of > 1 && !parameters.do_sample {
            return Err(Error::invalid_parameter(
                "best_of",
                "`best_of` > 1 requires `do_sample` to be true",
            ));
        }
        if best_of > 1 && parameters.seed.is_some() {
            return Err(Error::invalid_parameter(
                "best_of",
                "`seed` must not be set when `best_of` > 1",
            ));
        }
    }

    check_positive("repetition_penalty", parameters.repetition_penalty)?;
    check_positive("temperature", parameters.temperature)?;
    check_nonzero("top_k", parameters.top_k)?;
    check_open_unit("top_p", parameters.top_p)?;
    check_nonzero("truncate", parameters.truncate)?;
    check_open_unit("typical_p", parameters.typical_p)?;
    check_nonzero("max_new_tokens", parameters.max_new_tokens)?;
    check_nonzero("top_n_tokens", parameters.top_n_tokens)?;

    Ok(())
}

/// Request-level rules on top of [`validate_parameters`].
///
/// Streaming is rejected together with any option whose output is only known once the
/// whole generation is done: several `best_of` candidates, or prefill details.
pub fn validate_request(
    inputs: &str,
    parameters: Option<&GenerationParameters>,
    stream: bool,
) -> Result<()> {
    if inputs.is_empty() {
        return Err(Error::invalid_parameter("inputs", "must not be empty"));
    }

    let Some(parameters) = parameters else {
        return Ok(());
    };
    validate_parameters(parameters)?;

    if stream {
        if parameters.best_of.map(|n| n > 1).unwrap_or(false) {
            return Err(Error::invalid_parameter(
                "best_of",
                "`best_of` != 1 is not supported when `stream` is true",
            ));
        }
        if parameters.decoder_input_details {
            return Err(Error::invalid_parameter(
                "decoder_input_details",
                "`decoder_input_details` is not supported when `stream` is true",
            ));
        }
    }

    Ok(())
}

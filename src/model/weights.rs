//! Safetensors codec for the model weights file.
//!
//! The file holds two little-endian `F64` tensors: `coefficients` with shape
//! `[n]` and `intercept` with a single element.
use safetensors::{tensor::TensorView, Dtype, SafeTensors};

pub const COEFFICIENTS: &str = "coefficients";
pub const INTERCEPT: &str = "intercept";

const F64_SIZE: usize = std::mem::size_of::<f64>();

/// The numeric part of a linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Decodes a weights file.
///
/// # Errors
/// Returns a human-readable string if the buffer is not a safetensors
/// container or the expected tensors are missing or malformed.
pub fn read(bytes: &[u8]) -> Result<Weights, String> {
    let tensors =
        SafeTensors::deserialize(bytes).map_err(|e| format!("invalid safetensors data: {e}"))?;

    let (coefficients, shape) = read_f64(&tensors, COEFFICIENTS)?;
    if shape.len() != 1 {
        return Err(format!(
            "tensor {COEFFICIENTS:?} must have rank 1, got shape {shape:?}"
        ));
    }

    let (values, _) = read_f64(&tensors, INTERCEPT)?;
    let &[intercept] = values.as_slice() else {
        return Err(format!(
            "tensor {INTERCEPT:?} must hold exactly 1 element, got {}",
            values.len()
        ));
    };

    Ok(Weights {
        coefficients,
        intercept,
    })
}

/// Encodes a weights file.
///
/// # Errors
/// Returns a human-readable string if safetensors rejects the tensors.
pub fn write(weights: &Weights) -> Result<Vec<u8>, String> {
    let coef_bytes: Vec<u8> = weights
        .coefficients
        .iter()
        .flat_map(|c| c.to_le_bytes())
        .collect();
    let intercept_bytes = weights.intercept.to_le_bytes();

    let coefficients = TensorView::new(Dtype::F64, vec![weights.coefficients.len()], &coef_bytes)
        .map_err(|e| format!("cannot build {COEFFICIENTS:?} tensor: {e}"))?;
    let intercept = TensorView::new(Dtype::F64, vec![1], &intercept_bytes)
        .map_err(|e| format!("cannot build {INTERCEPT:?} tensor: {e}"))?;

    safetensors::serialize([(COEFFICIENTS, coefficients), (INTERCEPT, intercept)], &None)
        .map_err(|e| format!("cannot serialize weights: {e}"))
}

fn read_f64(tensors: &SafeTensors<'_>, name: &str) -> Result<(Vec<f64>, Vec<usize>), String> {
    let view = tensors
        .tensor(name)
        .map_err(|_| format!("missing tensor {name:?}"))?;

    if view.dtype() != Dtype::F64 {
        return Err(format!(
            "tensor {name:?} has dtype {:?}, expected F64",
            view.dtype()
        ));
    }

    let values = view
        .data()
        .chunks_exact(F64_SIZE)
        .map(|chunk| {
            let mut raw = [0u8; F64_SIZE];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();

    Ok((values, view.shape().to_vec()))
}

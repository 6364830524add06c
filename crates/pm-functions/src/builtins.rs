use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use pm_core::{PmError, PmValue};

use crate::{Arity, FunctionDescriptor, HostFunction};

/// Names of the always-available functions, in registry order.
pub const BUILTIN_FUNCTION_NAMES: [&str; 13] = [
    "abs", "bin", "bool", "float", "hex", "int", "long", "str", "len", "round", "min", "max",
    "time",
];

pub fn builtin_descriptors() -> Vec<FunctionDescriptor> {
    vec![
        FunctionDescriptor::new("AbsoluteValue", Arc::new(AbsoluteValue)),
        FunctionDescriptor::new("ConvertToBinary", Arc::new(ConvertToBinary)),
        FunctionDescriptor::new("ConvertToBoolean", Arc::new(ConvertToBoolean)),
        FunctionDescriptor::new("ConvertToFloat", Arc::new(ConvertToFloat)),
        FunctionDescriptor::new("ConvertToHexadecimal", Arc::new(ConvertToHexadecimal)),
        FunctionDescriptor::new("ConvertToInt", Arc::new(ConvertToInt::new("int"))),
        FunctionDescriptor::new("ConvertToInt", Arc::new(ConvertToInt::new("long"))),
        FunctionDescriptor::new("ConvertToString", Arc::new(ConvertToString)),
        FunctionDescriptor::new("LengthOf", Arc::new(LengthOf)),
        FunctionDescriptor::new("RoundedValue", Arc::new(RoundedValue)),
        FunctionDescriptor::new("MinimumValue", Arc::new(Extremum::min())),
        FunctionDescriptor::new("MaximumValue", Arc::new(Extremum::max())),
        FunctionDescriptor::new("GetTime", Arc::new(GetTime)),
    ]
}

fn type_error(name: &str, value: &PmValue) -> PmError {
    PmError::function_call(
        name,
        format!("unsupported argument type '{}'", value.type_name()),
    )
}

#[derive(Debug, Default)]
pub(crate) struct AbsoluteValue;

impl HostFunction for AbsoluteValue {
    fn name(&self) -> &str {
        "abs"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        match &args[0] {
            PmValue::Int(value) => value
                .checked_abs()
                .map(PmValue::Int)
                .ok_or_else(|| PmError::function_call("abs", "integer overflow")),
            PmValue::Float(value) => Ok(PmValue::Float(value.abs())),
            PmValue::Bool(value) => Ok(PmValue::Int(i64::from(*value))),
            other => Err(type_error(self.name(), other)),
        }
    }
}

fn radix_text(value: i64, prefix: &str, radix: u32) -> String {
    let digits = match radix {
        2 => format!("{:b}", value.unsigned_abs()),
        _ => format!("{:x}", value.unsigned_abs()),
    };
    if value < 0 {
        format!("-{}{}", prefix, digits)
    } else {
        format!("{}{}", prefix, digits)
    }
}

fn integral_arg(name: &str, value: &PmValue) -> Result<i64, PmError> {
    match value {
        PmValue::Int(value) => Ok(*value),
        PmValue::Bool(value) => Ok(i64::from(*value)),
        other => Err(type_error(name, other)),
    }
}

#[derive(Debug, Default)]
pub(crate) struct ConvertToBinary;

impl HostFunction for ConvertToBinary {
    fn name(&self) -> &str {
        "bin"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        let value = integral_arg(self.name(), &args[0])?;
        Ok(PmValue::Str(radix_text(value, "0b", 2)))
    }
}

#[derive(Debug, Default)]
pub(crate) struct ConvertToHexadecimal;

impl HostFunction for ConvertToHexadecimal {
    fn name(&self) -> &str {
        "hex"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        let value = integral_arg(self.name(), &args[0])?;
        Ok(PmValue::Str(radix_text(value, "0x", 16)))
    }
}

#[derive(Debug, Default)]
pub(crate) struct ConvertToBoolean;

impl HostFunction for ConvertToBoolean {
    fn name(&self) -> &str {
        "bool"
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        Ok(PmValue::Bool(
            args.first().map(PmValue::is_truthy).unwrap_or(false),
        ))
    }
}

#[derive(Debug, Default)]
pub(crate) struct ConvertToFloat;

impl HostFunction for ConvertToFloat {
    fn name(&self) -> &str {
        "float"
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        let Some(value) = args.first() else {
            return Ok(PmValue::Float(0.0));
        };
        match value {
            PmValue::Str(text) => text.trim().parse::<f64>().map(PmValue::Float).map_err(|_| {
                PmError::function_call(
                    self.name(),
                    format!("could not convert string to float: '{}'", text),
                )
            }),
            other => other
                .as_f64()
                .map(PmValue::Float)
                .ok_or_else(|| type_error(self.name(), other)),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ConvertToInt {
    name: &'static str,
}

impl ConvertToInt {
    pub(crate) fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for ConvertToInt {
    fn default() -> Self {
        Self::new("int")
    }
}

impl HostFunction for ConvertToInt {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        let Some(value) = args.first() else {
            return Ok(PmValue::Int(0));
        };
        match value {
            PmValue::Int(value) => Ok(PmValue::Int(*value)),
            PmValue::Bool(value) => Ok(PmValue::Int(i64::from(*value))),
            PmValue::Float(value) if value.is_finite() => Ok(PmValue::Int(value.trunc() as i64)),
            PmValue::Str(text) => text.trim().parse::<i64>().map(PmValue::Int).map_err(|_| {
                PmError::function_call(
                    self.name,
                    format!("invalid literal for {}() with base 10: '{}'", self.name, text),
                )
            }),
            other => Err(type_error(self.name, other)),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ConvertToString;

impl HostFunction for ConvertToString {
    fn name(&self) -> &str {
        "str"
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        Ok(PmValue::Str(
            args.first().map(ToString::to_string).unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Default)]
pub(crate) struct LengthOf;

impl HostFunction for LengthOf {
    fn name(&self) -> &str {
        "len"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        let length = match &args[0] {
            PmValue::Str(text) => text.chars().count(),
            PmValue::List(values) => values.len(),
            other => return Err(type_error(self.name(), other)),
        };
        Ok(PmValue::Int(length as i64))
    }
}

#[derive(Debug, Default)]
pub(crate) struct RoundedValue;

impl HostFunction for RoundedValue {
    fn name(&self) -> &str {
        "round"
    }

    fn arity(&self) -> Arity {
        Arity::range(1, 2)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        let value = args[0]
            .as_f64()
            .ok_or_else(|| type_error(self.name(), &args[0]))?;
        match args.get(1) {
            None => Ok(PmValue::Int(value.round_ties_even() as i64)),
            Some(digits) => {
                let digits = integral_arg(self.name(), digits)?;
                let scale = 10f64.powi(digits.clamp(-308, 308) as i32);
                Ok(PmValue::Float((value * scale).round_ties_even() / scale))
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct Extremum {
    name: &'static str,
    pick_greater: bool,
}

impl Extremum {
    pub(crate) fn min() -> Self {
        Self {
            name: "min",
            pick_greater: false,
        }
    }

    pub(crate) fn max() -> Self {
        Self {
            name: "max",
            pick_greater: true,
        }
    }
}

impl HostFunction for Extremum {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        Arity::at_least(1)
    }

    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        let candidates = match args {
            [PmValue::List(values)] => values.as_slice(),
            _ => args,
        };
        let mut best: Option<(&PmValue, f64)> = None;
        for candidate in candidates {
            let number = candidate
                .as_f64()
                .ok_or_else(|| type_error(self.name, candidate))?;
            let replace = match best {
                None => true,
                Some((_, current)) if self.pick_greater => number > current,
                Some((_, current)) => number < current,
            };
            if replace {
                best = Some((candidate, number));
            }
        }
        best.map(|(value, _)| value.clone()).ok_or_else(|| {
            PmError::function_call(self.name, format!("{}() arg is an empty sequence", self.name))
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct GetTime;

impl HostFunction for GetTime {
    fn name(&self) -> &str {
        "time"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(0)
    }

    fn call(&self, _args: &[PmValue]) -> Result<PmValue, PmError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|error| PmError::function_call(self.name(), error.to_string()))?;
        Ok(PmValue::Float(elapsed.as_secs_f64()))
    }
}

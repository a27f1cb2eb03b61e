use crate::filters::blur::blur_rgba8_premul;
use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{BoothError, BoothResult};
use crate::foundation::math::{
    premultiply_rgba8_in_place, unit_to_u8, unpremultiply_rgba8_in_place,
};

/// One function of a filter expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    /// `sepia(amount)`, amount in `[0, 1]`.
    Sepia(f32),
    /// `grayscale(amount)`, amount in `[0, 1]`.
    Grayscale(f32),
    /// `saturate(amount)`, unbounded above.
    Saturate(f32),
    /// `contrast(amount)`, 1 is identity.
    Contrast(f32),
    /// `brightness(amount)`, 1 is identity.
    Brightness(f32),
    /// `hue-rotate(angle)`, stored in degrees.
    HueRotate(f32),
    /// `blur(radius)`, Gaussian standard deviation in pixels.
    Blur(f32),
}

type Matrix3 = [[f32; 3]; 3];

impl FilterOp {
    fn color_matrix(self) -> Option<Matrix3> {
        match self {
            Self::Sepia(a) => {
                let s = 1.0 - a.clamp(0.0, 1.0);
                Some([
                    [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
                    [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
                    [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
                ])
            }
            Self::Grayscale(a) => {
                let s = 1.0 - a.clamp(0.0, 1.0);
                Some([
                    [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
                    [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
                    [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
                ])
            }
            Self::Saturate(s) => {
                let s = s.max(0.0);
                Some([
                    [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                ])
            }
            Self::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                Some([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
            Self::Contrast(_) | Self::Brightness(_) | Self::Blur(_) => None,
        }
    }

    /// Linear transfer `c * slope + intercept` for component-wise ops.
    fn transfer(self) -> Option<(f32, f32)> {
        match self {
            Self::Contrast(c) => {
                let c = c.max(0.0);
                Some((c, 0.5 - 0.5 * c))
            }
            Self::Brightness(b) => Some((b.max(0.0), 0.0)),
            _ => None,
        }
    }

    /// Apply this op to a straight RGBA8 frame in place.
    pub fn apply(self, frame: &mut RgbaFrame) -> BoothResult<()> {
        if let Self::Blur(sigma) = self {
            if sigma <= 0.0 {
                return Ok(());
            }
            let radius = (sigma * 3.0).ceil() as u32;
            premultiply_rgba8_in_place(&mut frame.data);
            frame.data = blur_rgba8_premul(&frame.data, frame.width, frame.height, radius, sigma)?;
            unpremultiply_rgba8_in_place(&mut frame.data);
            return Ok(());
        }

        if let Some(m) = self.color_matrix() {
            for px in frame.data.chunks_exact_mut(4) {
                let [r, g, b] = [px[0], px[1], px[2]].map(|c| f32::from(c) / 255.0);
                for (i, row) in m.iter().enumerate() {
                    px[i] = unit_to_u8(row[0] * r + row[1] * g + row[2] * b);
                }
            }
        } else if let Some((slope, intercept)) = self.transfer() {
            let mut lut = [0u8; 256];
            for (v, out) in lut.iter_mut().enumerate() {
                *out = unit_to_u8((v as f32 / 255.0) * slope + intercept);
            }
            for px in frame.data.chunks_exact_mut(4) {
                for c in &mut px[..3] {
                    *c = lut[*c as usize];
                }
            }
        }
        Ok(())
    }
}

/// Parse a filter expression such as `contrast(0.8) saturate(0.8)`.
///
/// `none` and the empty string parse to an empty pipeline.
pub fn parse_filter_expression(expr: &str) -> BoothResult<Vec<FilterOp>> {
    let trimmed = expr.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    let mut ops = Vec::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| {
            BoothError::validation(format!("filter '{expr}': expected '(' after function name"))
        })?;
        let close = rest[open..].find(')').map(|i| open + i).ok_or_else(|| {
            BoothError::validation(format!("filter '{expr}': unterminated function"))
        })?;
        let name = rest[..open].trim();
        let arg = rest[open + 1..close].trim();
        ops.push(parse_function(name, arg).map_err(|e| {
            BoothError::validation(format!("filter '{expr}': {e}"))
        })?);
        rest = rest[close + 1..].trim_start();
    }
    Ok(ops)
}

fn parse_function(name: &str, arg: &str) -> Result<FilterOp, String> {
    match name.to_ascii_lowercase().as_str() {
        "sepia" => parse_amount(arg).map(FilterOp::Sepia),
        "grayscale" => parse_amount(arg).map(FilterOp::Grayscale),
        "saturate" => parse_amount(arg).map(FilterOp::Saturate),
        "contrast" => parse_amount(arg).map(FilterOp::Contrast),
        "brightness" => parse_amount(arg).map(FilterOp::Brightness),
        "hue-rotate" => parse_angle(arg).map(FilterOp::HueRotate),
        "blur" => parse_length(arg).map(FilterOp::Blur),
        other => Err(format!("unsupported function '{other}'")),
    }
}

fn parse_number(s: &str) -> Result<f32, String> {
    let v: f32 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{s}'"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("argument '{s}' must be finite and >= 0"));
    }
    Ok(v)
}

fn parse_amount(arg: &str) -> Result<f32, String> {
    if arg.is_empty() {
        return Ok(1.0);
    }
    match arg.strip_suffix('%') {
        Some(pct) => parse_number(pct).map(|v| v / 100.0),
        None => parse_number(arg),
    }
}

fn parse_angle(arg: &str) -> Result<f32, String> {
    if arg.is_empty() || arg == "0" {
        return Ok(0.0);
    }
    let signed = |s: &str| -> Result<f32, String> {
        match s.strip_prefix('-') {
            Some(abs) => parse_number(abs).map(|v| -v),
            None => parse_number(s),
        }
    };
    if let Some(v) = arg.strip_suffix("deg") {
        signed(v)
    } else if let Some(v) = arg.strip_suffix("grad") {
        signed(v).map(|g| g * 0.9)
    } else if let Some(v) = arg.strip_suffix("rad") {
        signed(v).map(f32::to_degrees)
    } else if let Some(v) = arg.strip_suffix("turn") {
        signed(v).map(|t| t * 360.0)
    } else {
        Err(format!("angle '{arg}' needs a unit (deg, rad, grad, turn)"))
    }
}

fn parse_length(arg: &str) -> Result<f32, String> {
    if arg.is_empty() || arg == "0" {
        return Ok(0.0);
    }
    let v = arg
        .strip_suffix("px")
        .ok_or_else(|| format!("length '{arg}' must be in px"))?;
    parse_number(v)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/ops.rs"]
mod tests;

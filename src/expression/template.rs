use crate::expression::{Env, Expression, Value};
use crate::foundation::error::{PostproError, PostproResult};

/// Text with `{expr}` / `{expr:spec}` placeholders, as used by `savefile`, `name` and
/// `imagefilename` options.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Text(String),
    Field { expr: Expression, spec: FormatSpec },
}

impl Template {
    /// Parse `src`. `{{` and `}}` produce literal braces.
    pub fn parse(src: &str) -> PostproResult<Self> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = src.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    text.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    text.push('}');
                }
                '}' => {
                    return Err(PostproError::expression(format!(
                        "template '{src}': single '}}' at byte {i}"
                    )));
                }
                '{' => {
                    let mut depth = 0usize;
                    let mut colon = None;
                    let mut end = None;
                    for (j, d) in chars.by_ref() {
                        match d {
                            '(' | '[' => depth += 1,
                            ')' | ']' => depth = depth.saturating_sub(1),
                            ':' if depth == 0 && colon.is_none() => colon = Some(j),
                            '}' if depth == 0 => {
                                end = Some(j);
                                break;
                            }
                            _ => {}
                        }
                    }
                    let Some(end) = end else {
                        return Err(PostproError::expression(format!(
                            "template '{src}': unclosed '{{' at byte {i}"
                        )));
                    };
                    let (expr_src, spec_src) = match colon {
                        Some(c) => (&src[i + 1..c], &src[c + 1..end]),
                        None => (&src[i + 1..end], ""),
                    };
                    if expr_src.trim().is_empty() {
                        return Err(PostproError::expression(format!(
                            "template '{src}': empty placeholder at byte {i}"
                        )));
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    let trimmed = expr_src.trim();
                    let lead = expr_src.len() - expr_src.trim_start().len();
                    let expr = Expression::from_source(trimmed).map_err(|e| {
                        PostproError::expression(e.shifted(i + 1 + lead).pointed(src))
                    })?;
                    segments.push(Segment::Field {
                        expr,
                        spec: FormatSpec::parse(spec_src)?,
                    });
                }
                other => text.push(other),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: src.to_owned(),
            segments,
        })
    }

    /// Template text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the template has no placeholders.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Text(_)))
    }

    /// Substitute every placeholder using `env`.
    pub fn render(&self, env: &dyn Env) -> PostproResult<String> {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Field { expr, spec } => out.push_str(&spec.format(&expr.eval(env)?)?),
            }
        }
        Ok(out)
    }
}

/// Plot title: placeholders are substituted outside `$...$` math segments only.
#[derive(Debug, Clone)]
pub struct TitleTemplate {
    parts: Vec<TitlePart>,
}

#[derive(Debug, Clone)]
enum TitlePart {
    Plain(Template),
    Math(String),
}

impl TitleTemplate {
    /// Split on `$` and parse the non-math parts. An unmatched trailing `$` is kept
    /// as text.
    pub fn parse(src: &str) -> PostproResult<Self> {
        let pieces: Vec<&str> = src.split('$').collect();
        let balanced = pieces.len() % 2 == 1;
        let mut parts = Vec::with_capacity(pieces.len());
        for (k, piece) in pieces.iter().enumerate() {
            let is_last = k + 1 == pieces.len();
            if k % 2 == 1 && !(is_last && !balanced) {
                parts.push(TitlePart::Math(format!("${piece}$")));
            } else if k % 2 == 1 {
                parts.push(TitlePart::Plain(Template::parse(&format!("${piece}"))?));
            } else {
                parts.push(TitlePart::Plain(Template::parse(piece)?));
            }
        }
        Ok(Self { parts })
    }

    /// Render with math segments kept verbatim, `$` delimiters included.
    pub fn render(&self, env: &dyn Env) -> PostproResult<String> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                TitlePart::Plain(t) => out.push_str(&t.render(env)?),
                TitlePart::Math(m) => out.push_str(m),
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Space,
}

/// Python-style format specification:
/// `[[fill]align][sign][0][width][.precision][type]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    fill: char,
    align: Option<Align>,
    sign: Sign,
    width: usize,
    precision: Option<usize>,
    ty: Option<char>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            sign: Sign::Minus,
            width: 0,
            precision: None,
            ty: None,
        }
    }
}

fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

impl FormatSpec {
    /// Parse a spec such as `05d`, `.3f`, `>8.2e`.
    pub fn parse(spec: &str) -> PostproResult<Self> {
        let err = || PostproError::expression(format!("invalid format spec '{spec}'"));
        let chars: Vec<char> = spec.chars().collect();
        let mut out = Self::default();
        let mut i = 0usize;

        if chars.len() >= 2
            && let Some(a) = align_of(chars[1])
        {
            out.fill = chars[0];
            out.align = Some(a);
            i = 2;
        } else if let Some(a) = chars.first().copied().and_then(align_of) {
            out.align = Some(a);
            i = 1;
        }

        match chars.get(i) {
            Some('+') => {
                out.sign = Sign::Plus;
                i += 1;
            }
            Some('-') => i += 1,
            Some(' ') => {
                out.sign = Sign::Space;
                i += 1;
            }
            _ => {}
        }

        if chars.get(i) == Some(&'0') {
            if out.align.is_none() {
                out.fill = '0';
                out.align = Some(Align::AfterSign);
            }
            i += 1;
        }

        let start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i > start {
            out.width = chars[start..i]
                .iter()
                .collect::<String>()
                .parse()
                .map_err(|_| err())?;
        }

        if chars.get(i) == Some(&'.') {
            i += 1;
            let start = i;
            while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
                i += 1;
            }
            if i == start {
                return Err(err());
            }
            out.precision = Some(
                chars[start..i]
                    .iter()
                    .collect::<String>()
                    .parse()
                    .map_err(|_| err())?,
            );
        }

        match chars.get(i) {
            Some(&c) if "dfFeEgG%s".contains(c) => {
                out.ty = Some(c);
                i += 1;
            }
            _ => {}
        }

        if i != chars.len() {
            return Err(err());
        }
        Ok(out)
    }

    /// Format one value according to this spec.
    pub fn format(&self, v: &Value) -> PostproResult<String> {
        let (body, numeric) = match (self.ty, v) {
            (Some('s'), v) => (plain(v), false),
            (_, Value::Array(_)) => (plain(v), false),
            (None, Value::Bool(_)) => (plain(v), false),
            (Some('d'), v) => {
                let f = v.as_f64()?;
                if f.fract() != 0.0 || !f.is_finite() {
                    return Err(PostproError::evaluation(format!(
                        "format code 'd' needs an integer, got {f}"
                    )));
                }
                (format!("{}", f as i64), true)
            }
            (None, Value::Int(i)) if self.precision.is_none() => (i.to_string(), true),
            (None, v) => match self.precision {
                Some(p) => (fmt_general(v.as_f64()?, p, false), true),
                None => (repr_f64(v.as_f64()?), true),
            },
            (Some(t), v) => {
                let x = v.as_f64()?;
                let p = self.precision.unwrap_or(6);
                let s = match t {
                    'f' | 'F' => format!("{x:.p$}"),
                    'e' | 'E' => fmt_exp(x, p, t == 'E'),
                    'g' | 'G' => fmt_general(x, p, t == 'G'),
                    _ => format!("{:.p$}%", x * 100.0),
                };
                (s, true)
            }
        };

        let (neg, digits) = match body.strip_prefix('-') {
            Some(rest) if numeric => (true, rest.to_owned()),
            _ => (false, body),
        };
        let sign = if !numeric {
            ""
        } else if neg {
            "-"
        } else {
            match self.sign {
                Sign::Plus => "+",
                Sign::Space => " ",
                Sign::Minus => "",
            }
        };

        let len = sign.chars().count() + digits.chars().count();
        let pad = self.width.saturating_sub(len);
        let fill = |n: usize| std::iter::repeat_n(self.fill, n).collect::<String>();
        let align = self
            .align
            .unwrap_or(if numeric { Align::Right } else { Align::Left });
        Ok(match align {
            Align::Left => format!("{sign}{digits}{}", fill(pad)),
            Align::Right => format!("{}{sign}{digits}", fill(pad)),
            Align::Center => format!("{}{sign}{digits}{}", fill(pad / 2), fill(pad - pad / 2)),
            Align::AfterSign => format!("{sign}{}{digits}", fill(pad)),
        })
    }
}

/// Default rendering: integers without fraction, floats with at least one decimal.
fn plain(v: &Value) -> String {
    match v {
        Value::Int(i) => i.to_string(),
        Value::Float(f) => repr_f64(*f),
        Value::Bool(b) => if *b { "True" } else { "False" }.to_owned(),
        Value::Array(a) => {
            let items: Vec<String> = a.iter().map(|x| repr_f64(*x)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn repr_f64(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if x.fract() == 0.0 && x.abs() < 1e16 {
        return format!("{x:.1}");
    }
    if x != 0.0 && (x.abs() >= 1e16 || x.abs() < 1e-4) {
        let s = format!("{x:e}");
        return python_exponent(&s, false);
    }
    format!("{x}")
}

/// Rewrite Rust's `1.5e3` as `1.5e+03`.
fn python_exponent(s: &str, upper: bool) -> String {
    let Some((mant, exp)) = s.split_once('e') else {
        return s.to_owned();
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exp),
    };
    let e = if upper { 'E' } else { 'e' };
    format!("{mant}{e}{sign}{digits:0>2}")
}

fn fmt_exp(x: f64, p: usize, upper: bool) -> String {
    if !x.is_finite() {
        return repr_f64(x);
    }
    python_exponent(&format!("{x:.p$e}"), upper)
}

fn fmt_general(x: f64, p: usize, upper: bool) -> String {
    if !x.is_finite() {
        return repr_f64(x);
    }
    let p = p.max(1);
    if x == 0.0 {
        return "0".to_owned();
    }
    let sci = format!("{:.*e}", p - 1, x);
    let exp: i32 = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    if exp >= -4 && exp < p as i32 {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{x:.decimals$}"))
    } else {
        let (mant, rest) = sci.split_once('e').unwrap_or((&sci, "0"));
        python_exponent(&format!("{}e{rest}", strip_zeros(mant)), upper)
    }
}

fn strip_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_owned();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/expression/template.rs"]
mod tests;

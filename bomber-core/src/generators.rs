//! Synthetic value generation
//!
//! Implements the uniform `generate()` capability over [`GeneratorSpec`]
//! variants. Word and digit values come straight from the RNG; regex values
//! are sampled by a small pattern walker covering literals, escapes, character
//! classes and quantifiers, with every sample verified against the compiled
//! pattern before use. Unsupported constructs (groups, alternation, negated
//! classes) fail fast instead of producing a value that silently drifts from
//! the requested shape.

use crate::error::{BomberError, EngineResult};
use bomber_common::GeneratorSpec;
use rand::Rng;

/// Upper bound for open-ended quantifiers (`*`, `+`, `{n,}`).
const REPEAT_CAP: usize = 8;

/// Uniform generation capability, dispatched by generator kind.
pub trait Generate {
    /// Validate the generator configuration without producing a value.
    fn validate(&self) -> EngineResult<()>;

    /// Produce a string value.
    fn generate(&self) -> EngineResult<String>;

    /// Produce a JSON value; digit generators yield numbers, the rest strings.
    fn generate_json(&self) -> EngineResult<serde_json::Value>;
}

impl Generate for GeneratorSpec {
    fn validate(&self) -> EngineResult<()> {
        match self {
            GeneratorSpec::Word { min_len, max_len } => {
                if *min_len == 0 || min_len > max_len {
                    return Err(BomberError::generator(format!(
                        "invalid word length bounds {}..={}",
                        min_len, max_len
                    )));
                }
            }
            GeneratorSpec::Digit { min, max } => {
                if min > max {
                    return Err(BomberError::generator(format!(
                        "invalid digit bounds {}..={}",
                        min, max
                    )));
                }
            }
            GeneratorSpec::Regex { pattern } => {
                if pattern.is_empty() {
                    return Err(BomberError::generator("empty regex pattern"));
                }
                regex::Regex::new(pattern).map_err(|e| {
                    BomberError::generator(format!("invalid regex pattern '{}': {}", pattern, e))
                })?;
            }
        }
        Ok(())
    }

    fn generate(&self) -> EngineResult<String> {
        self.validate()?;
        let mut rng = rand::thread_rng();
        match self {
            GeneratorSpec::Word { min_len, max_len } => {
                let len = rng.gen_range(*min_len..=*max_len);
                Ok((0..len)
                    .map(|_| rng.gen_range(b'a'..=b'z') as char)
                    .collect())
            }
            GeneratorSpec::Digit { min, max } => Ok(rng.gen_range(*min..=*max).to_string()),
            GeneratorSpec::Regex { pattern } => sample_regex(pattern, &mut rng),
        }
    }

    fn generate_json(&self) -> EngineResult<serde_json::Value> {
        self.validate()?;
        match self {
            GeneratorSpec::Digit { min, max } => {
                let mut rng = rand::thread_rng();
                Ok(serde_json::Value::from(rng.gen_range(*min..=*max)))
            }
            _ => Ok(serde_json::Value::String(self.generate()?)),
        }
    }
}

/// Sample a value from `pattern` and verify it against the compiled regex.
fn sample_regex(pattern: &str, rng: &mut impl Rng) -> EngineResult<String> {
    let candidate = sample_pattern(pattern, rng)?;
    let anchored = regex::Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        BomberError::generator(format!("invalid regex pattern '{}': {}", pattern, e))
    })?;
    if !anchored.is_match(&candidate) {
        return Err(BomberError::generator(format!(
            "sampled value '{}' does not satisfy pattern '{}'",
            candidate, pattern
        )));
    }
    Ok(candidate)
}

fn sample_pattern(pattern: &str, rng: &mut impl Rng) -> EngineResult<String> {
    let mut out = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        let pool: Vec<char> = match c {
            '^' | '$' => continue,
            '\\' => {
                let escaped = chars.next().ok_or_else(|| {
                    BomberError::generator("dangling escape at end of pattern")
                })?;
                escape_pool(escaped)?
            }
            '[' => class_pool(&mut chars)?,
            '.' => ascii_pool(),
            '(' | ')' | '|' => {
                return Err(BomberError::generator(format!(
                    "unsupported regex construct '{}' in pattern '{}'",
                    c, pattern
                )));
            }
            '?' | '*' | '+' | '{' => {
                return Err(BomberError::generator(format!(
                    "quantifier '{}' with nothing to repeat",
                    c
                )));
            }
            literal => vec![literal],
        };

        let (min, max) = parse_quantifier(&mut chars)?;
        let count = rng.gen_range(min..=max);
        for _ in 0..count {
            out.push(pool[rng.gen_range(0..pool.len())]);
        }
    }

    Ok(out)
}

fn escape_pool(escaped: char) -> EngineResult<Vec<char>> {
    match escaped {
        'd' => Ok(('0'..='9').collect()),
        'w' => {
            let mut pool: Vec<char> = ('a'..='z').collect();
            pool.extend('A'..='Z');
            pool.extend('0'..='9');
            pool.push('_');
            Ok(pool)
        }
        's' => Ok(vec![' ']),
        '\\' | '.' | '?' | '*' | '+' | '{' | '}' | '[' | ']' | '(' | ')' | '|' | '^' | '$'
        | '-' | '/' => Ok(vec![escaped]),
        other => Err(BomberError::generator(format!(
            "unsupported escape '\\{}'",
            other
        ))),
    }
}

fn class_pool(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> EngineResult<Vec<char>> {
    let mut pool = Vec::new();
    let mut prev: Option<char> = None;

    if chars.peek() == Some(&'^') {
        return Err(BomberError::generator(
            "negated character classes are not supported",
        ));
    }

    loop {
        let c = chars
            .next()
            .ok_or_else(|| BomberError::generator("unterminated character class"))?;
        match c {
            ']' => break,
            '\\' => {
                let escaped = chars.next().ok_or_else(|| {
                    BomberError::generator("dangling escape inside character class")
                })?;
                pool.extend(escape_pool(escaped)?);
                prev = None;
            }
            '-' => match (prev, chars.peek()) {
                (Some(start), Some(&end)) if end != ']' => {
                    chars.next();
                    if start > end {
                        return Err(BomberError::generator(format!(
                            "inverted class range {}-{}",
                            start, end
                        )));
                    }
                    // start itself is already in the pool
                    pool.extend(((start as u32 + 1)..=(end as u32)).filter_map(char::from_u32));
                    prev = None;
                }
                _ => {
                    pool.push('-');
                    prev = None;
                }
            },
            other => {
                pool.push(other);
                prev = Some(other);
            }
        }
    }

    if pool.is_empty() {
        return Err(BomberError::generator("empty character class"));
    }
    Ok(pool)
}

fn ascii_pool() -> Vec<char> {
    let mut pool: Vec<char> = ('a'..='z').collect();
    pool.extend('A'..='Z');
    pool.extend('0'..='9');
    pool
}

fn parse_quantifier(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> EngineResult<(usize, usize)> {
    match chars.peek() {
        Some('?') => {
            chars.next();
            Ok((0, 1))
        }
        Some('*') => {
            chars.next();
            Ok((0, REPEAT_CAP))
        }
        Some('+') => {
            chars.next();
            Ok((1, REPEAT_CAP))
        }
        Some('{') => {
            chars.next();
            let mut spec = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => spec.push(c),
                    None => return Err(BomberError::generator("unterminated quantifier")),
                }
            }
            parse_bounds(&spec)
        }
        _ => Ok((1, 1)),
    }
}

fn parse_bounds(spec: &str) -> EngineResult<(usize, usize)> {
    let bad = || BomberError::generator(format!("invalid quantifier '{{{}}}'", spec));
    match spec.split_once(',') {
        None => {
            let n: usize = spec.trim().parse().map_err(|_| bad())?;
            Ok((n, n))
        }
        Some((lo, "")) => {
            let n: usize = lo.trim().parse().map_err(|_| bad())?;
            Ok((n, n + REPEAT_CAP))
        }
        Some((lo, hi)) => {
            let min: usize = lo.trim().parse().map_err(|_| bad())?;
            let max: usize = hi.trim().parse().map_err(|_| bad())?;
            if min > max {
                return Err(bad());
            }
            Ok((min, max))
        }
    }
}

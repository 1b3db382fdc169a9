/// Color utilities for job rows.
use std::collections::{HashMap, HashSet};

use rand::RngExt;

use crate::types::JobId;

/// Background used for jobs without a color and when the random pool runs dry.
pub const ROW_COLOUR: Rgba = Rgba {
    r: 0.3,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

pub const BLACK: Rgba = Rgba {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

pub const WHITE: Rgba = Rgba {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from a stored component array. Only RGB and RGBA arrays are valid.
    pub fn from_stored(value: &[f64]) -> Self {
        match value {
            [r, g, b] => Self::rgb(*r, *g, *b),
            [r, g, b, a] => Self {
                r: *r,
                g: *g,
                b: *b,
                a: *a,
            },
            _ => ROW_COLOUR,
        }
    }

    pub fn to_stored(self) -> Vec<f64> {
        if self.a >= 1.0 {
            vec![self.r, self.g, self.b]
        } else {
            vec![self.r, self.g, self.b, self.a]
        }
    }

    pub fn luminance(self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    pub fn is_bright(self) -> bool {
        self.luminance() > 0.5
    }

    /// Text color with enough contrast against this background.
    pub fn foreground(self) -> Rgba {
        if self.is_bright() { BLACK } else { WHITE }
    }

    pub fn to_hex(self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    pub fn parse_hex(s: &str) -> Option<Self> {
        if !is_valid_hex(s) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok().map(|v| f64::from(v) / 255.0);
        Some(Self::rgb(channel(1)?, channel(3)?, channel(5)?))
    }
}

/// Validate if a string is a valid hex color (e.g., #RRGGBB).
pub fn is_valid_hex(s: &str) -> bool {
    s.starts_with('#') && s.len() == 7 && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Parses the stored text form `r,g,b[,a]`. Unparsable input yields an empty array.
pub fn parse_stored(raw: &str) -> Vec<f64> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_default()
}

pub fn format_stored(value: &[f64]) -> String {
    value
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn random_colour<R: RngExt>(rng: &mut R) -> Rgba {
    Rgba::rgb(
        rng.random_range(0.0..=1.0),
        rng.random_range(0.0..=1.0),
        rng.random_range(0.0..=1.0),
    )
}

pub fn random_storable<R: RngExt>(rng: &mut R) -> Vec<f64> {
    random_colour(rng).to_stored()
}

/// Hands out row colors to jobs that have none stored.
///
/// The pool holds twice as many random colors as there are distinct jobs.
/// A job seen for the first time gets a random pool color that no other job
/// holds yet. Once every pool color is taken, further jobs receive
/// [`ROW_COLOUR`]; that fallback is reported through `tracing` and is the
/// only outcome of exhausting the pool.
pub struct ColorAssigner {
    pool: Vec<Rgba>,
    assigned: HashMap<JobId, Rgba>,
}

impl ColorAssigner {
    pub fn new<R: RngExt>(job_ids: &[JobId], rng: &mut R) -> Self {
        let distinct: HashSet<&JobId> = job_ids.iter().collect();
        let pool = (0..distinct.len() * 2).map(|_| random_colour(rng)).collect();
        Self {
            pool,
            assigned: HashMap::new(),
        }
    }

    pub fn with_pool(pool: Vec<Rgba>) -> Self {
        Self {
            pool,
            assigned: HashMap::new(),
        }
    }

    pub fn assign<R: RngExt>(&mut self, jid: JobId, rng: &mut R) -> Rgba {
        if let Some(colour) = self.assigned.get(&jid) {
            return *colour;
        }
        let unused: Vec<Rgba> = self
            .pool
            .iter()
            .copied()
            .filter(|c| !self.assigned.values().any(|used| used == c))
            .collect();
        let colour = if unused.is_empty() {
            tracing::debug!(jid, pool = self.pool.len(), "colour pool exhausted, using fallback");
            ROW_COLOUR
        } else {
            unused[rng.random_range(0..unused.len())]
        };
        self.assigned.insert(jid, colour);
        colour
    }

    /// Stored color when the job has one, otherwise a pool assignment.
    pub fn colour_for<R: RngExt>(
        &mut self,
        jid: JobId,
        stored: &[f64],
        rng: &mut R,
    ) -> Rgba {
        if stored.is_empty() {
            self.assign(jid, rng)
        } else {
            Rgba::from_stored(stored)
        }
    }
}

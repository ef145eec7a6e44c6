use std::fmt;
use std::ops::{Add, Index, IndexMut};

/// A yield kind tracked per city and civilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stat {
    Production,
    Food,
    Gold,
    Science,
    Culture,
    Happiness,
    Faith,
}

impl Stat {
    pub const ALL: [Stat; 7] = [
        Stat::Production,
        Stat::Food,
        Stat::Gold,
        Stat::Science,
        Stat::Culture,
        Stat::Happiness,
        Stat::Faith,
    ];

    /// Stats that are stockpiled per civilization rather than per city.
    pub const CIV_WIDE: [Stat; 4] = [Stat::Gold, Stat::Science, Stat::Culture, Stat::Faith];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Stat::Production => "Production",
            Stat::Food => "Food",
            Stat::Gold => "Gold",
            Stat::Science => "Science",
            Stat::Culture => "Culture",
            Stat::Happiness => "Happiness",
            Stat::Faith => "Faith",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Stat> {
        Stat::ALL.into_iter().find(|s| s.name() == name)
    }

    #[inline]
    #[must_use]
    pub fn is_civ_wide(self) -> bool {
        Stat::CIV_WIDE.contains(&self)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bundle of signed stat amounts, e.g. `+1 Gold, +2 Production`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    values: [f32; 7],
}

impl Stats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, stat: Stat, amount: f32) -> Self {
        self[stat] = amount;
        self
    }

    /// Parse a stats literal. Entries are `+N Stat` or `-N Stat`
    /// separated by `", "`; a repeated stat accumulates.
    #[must_use]
    pub fn parse(text: &str) -> Option<Stats> {
        let mut stats = Stats::default();
        for entry in text.split(", ") {
            let (amount, name) = entry.split_once(' ')?;
            let sign = match amount.chars().next()? {
                '+' => 1.0,
                '-' => -1.0,
                _ => return None,
            };
            let digits = &amount[1..];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let value: f32 = digits.parse().ok()?;
            let stat = Stat::from_name(name)?;
            stats[stat] += sign * value;
        }
        Some(stats)
    }

    /// Whether `text` is a well-formed stats literal.
    #[must_use]
    pub fn is_stats(text: &str) -> bool {
        Self::parse(text).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Every stat with a non-zero amount, in [`Stat::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, f32)> + '_ {
        Stat::ALL
            .into_iter()
            .map(|s| (s, self[s]))
            .filter(|(_, v)| *v != 0.0)
    }

    #[must_use]
    pub fn times(&self, factor: f32) -> Stats {
        let mut out = *self;
        for v in &mut out.values {
            *v *= factor;
        }
        out
    }
}

impl Index<Stat> for Stats {
    type Output = f32;

    #[inline]
    fn index(&self, stat: Stat) -> &f32 {
        &self.values[stat.index()]
    }
}

impl IndexMut<Stat> for Stats {
    #[inline]
    fn index_mut(&mut self, stat: Stat) -> &mut f32 {
        &mut self.values[stat.index()]
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(mut self, rhs: Stats) -> Stats {
        for (a, b) in self.values.iter_mut().zip(rhs.values) {
            *a += b;
        }
        self
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (stat, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            if value > 0.0 {
                write!(f, "+{value} {stat}")?;
            } else {
                write!(f, "{value} {stat}")?;
            }
        }
        Ok(())
    }
}

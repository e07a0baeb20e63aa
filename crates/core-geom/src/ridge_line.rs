use std::ops::{Add, Sub};

use crate::Vec2;

/// A step function describing the silhouette of a subtree along its top or
/// bottom edge, relative to the subtree's input/output line.
///
/// The function equals `before` to the left of the first breakpoint, and
/// equals `ridge[i].y` on `[ridge[i].x, ridge[i + 1].x)`. `ridge` is sorted
/// by `x` and has no two consecutive points with equal `y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RidgeLine {
    pub before: i64,
    pub ridge: Vec<Vec2>,
}

impl RidgeLine {
    pub fn new(before: i64, ridge: Vec<Vec2>) -> Self {
        Self { before, ridge }
    }

    pub fn flat(before: i64) -> Self {
        Self {
            before,
            ridge: Vec::new(),
        }
    }

    /// Element-wise `cmp` at every breakpoint of `self` and `other` (cmp =
    /// `max` for envelopes, `min` for clipping). Linear in total breakpoints.
    pub fn merge(&self, other: &RidgeLine, cmp: impl Fn(i64, i64) -> i64) -> RidgeLine {
        let before = cmp(self.before, other.before);
        let mut ridge = Vec::new();

        let mut li = 0usize;
        let mut ri = 0usize;
        let mut cur_l = self.before;
        let mut cur_r = other.before;
        let mut last_y: Option<i64> = None;

        while li < self.ridge.len() || ri < other.ridge.len() {
            let next_x = match (self.ridge.get(li), other.ridge.get(ri)) {
                (Some(l), Some(r)) => l.x.min(r.x),
                (Some(l), None) => l.x,
                (None, Some(r)) => r.x,
                (None, None) => unreachable!(),
            };
            if let Some(l) = self.ridge.get(li) {
                if l.x == next_x {
                    cur_l = l.y;
                    li += 1;
                }
            }
            if let Some(r) = other.ridge.get(ri) {
                if r.x == next_x {
                    cur_r = r.y;
                    ri += 1;
                }
            }
            let y = cmp(cur_l, cur_r);
            if last_y != Some(y) {
                ridge.push(Vec2::new(next_x, y));
                last_y = Some(y);
            }
        }

        RidgeLine { before, ridge }
    }

    /// Mirror this ridge line horizontally around `pivot`, shifting `before`
    /// and every point's `y` one step back so "before the first step" stays
    /// consistent after the mirror.
    pub fn reverse(&self, pivot: i64) -> RidgeLine {
        let before = self.ridge.last().map(|p| p.y).unwrap_or(self.before);
        let mut ridge = Vec::with_capacity(self.ridge.len());
        let mut prev_y = self.before;
        for p in &self.ridge {
            ridge.push(Vec2::new(pivot - p.x, prev_y));
            prev_y = p.y;
        }
        ridge.reverse();
        RidgeLine { before, ridge }
    }

    /// Maximum of `top.y + bottom.y` across all shared breakpoints — the
    /// minimum vertical separation that keeps `top` and `bottom` from
    /// overlapping.
    pub fn distance(top: &RidgeLine, bottom: &RidgeLine) -> i64 {
        let mut d = top.before + bottom.before;

        let mut ti = 0usize;
        let mut bi = 0usize;
        let mut cur_top = top.before;
        let mut cur_bottom = bottom.before;

        while ti < top.ridge.len() || bi < bottom.ridge.len() {
            let next_x = match (top.ridge.get(ti), bottom.ridge.get(bi)) {
                (Some(t), Some(b)) => t.x.min(b.x),
                (Some(t), None) => t.x,
                (None, Some(b)) => b.x,
                (None, None) => unreachable!(),
            };
            if let Some(t) = top.ridge.get(ti) {
                if t.x == next_x {
                    cur_top = t.y;
                    ti += 1;
                }
            }
            if let Some(b) = bottom.ridge.get(bi) {
                if b.x == next_x {
                    cur_bottom = b.y;
                    bi += 1;
                }
            }
            d = d.max(cur_top + cur_bottom);
        }

        d
    }
}

impl Add<Vec2> for RidgeLine {
    type Output = RidgeLine;

    fn add(self, rhs: Vec2) -> RidgeLine {
        RidgeLine {
            before: self.before + rhs.y,
            ridge: self.ridge.into_iter().map(|p| p + rhs).collect(),
        }
    }
}

impl Sub<Vec2> for RidgeLine {
    type Output = RidgeLine;

    fn sub(self, rhs: Vec2) -> RidgeLine {
        self + Vec2::new(-rhs.x, -rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_max_picks_higher_envelope() {
        let a = RidgeLine::new(0, vec![Vec2::new(5, 3)]);
        let b = RidgeLine::new(1, vec![Vec2::new(2, 2)]);
        let merged = a.merge(&b, i64::max);
        assert_eq!(merged.before, 1);
        assert_eq!(merged.ridge, vec![Vec2::new(2, 2), Vec2::new(5, 3)]);
    }

    #[test]
    fn merge_dedupes_equal_consecutive_y() {
        let a = RidgeLine::new(0, vec![Vec2::new(2, 5), Vec2::new(4, 5)]);
        let b = RidgeLine::flat(0);
        let merged = a.merge(&b, i64::max);
        assert_eq!(merged.ridge, vec![Vec2::new(2, 5)]);
    }

    #[test]
    fn reverse_mirrors_and_shifts() {
        let r = RidgeLine::new(1, vec![Vec2::new(2, 3), Vec2::new(5, 7)]);
        let reversed = r.reverse(10);
        assert_eq!(reversed.before, 7);
        assert_eq!(reversed.ridge, vec![Vec2::new(5, 1), Vec2::new(8, 3)]);
    }

    #[test]
    fn reverse_twice_is_identity_around_same_pivot() {
        let r = RidgeLine::new(1, vec![Vec2::new(2, 3), Vec2::new(5, 7)]);
        let back = r.reverse(10).reverse(10);
        assert_eq!(back, r);
    }

    #[test]
    fn distance_of_flat_lines_is_sum_of_befores() {
        let top = RidgeLine::flat(2);
        let bottom = RidgeLine::flat(3);
        assert_eq!(RidgeLine::distance(&top, &bottom), 5);
    }

    #[test]
    fn distance_accounts_for_shared_breakpoints() {
        let top = RidgeLine::new(0, vec![Vec2::new(3, 4)]);
        let bottom = RidgeLine::new(0, vec![Vec2::new(3, 1)]);
        assert_eq!(RidgeLine::distance(&top, &bottom), 5);
    }
}

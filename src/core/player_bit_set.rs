use std::ops::{BitAnd, BitOr};

/// A set of seat indices (0 is the button) backed by a `u16`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerBitSet {
    set: u16,
}

impl PlayerBitSet {
    /// A set containing seats `0..players`.
    pub fn new(players: usize) -> Self {
        let set = ((1u32 << players) - 1) as u16;
        Self { set }
    }
    pub fn count(&self) -> usize {
        self.set.count_ones() as usize
    }
    pub fn empty(&self) -> bool {
        self.set == 0
    }
    pub fn enable(&mut self, idx: usize) {
        self.set |= 1 << idx;
    }
    pub fn disable(&mut self, idx: usize) {
        self.set &= !(1 << idx);
    }
    pub fn get(&self, idx: usize) -> bool {
        (self.set & (1 << idx)) != 0
    }
    pub fn ones(self) -> ActivePlayerBitSetIter {
        ActivePlayerBitSetIter { set: self.set }
    }
}

impl BitOr for PlayerBitSet {
    type Output = PlayerBitSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            set: self.set | rhs.set,
        }
    }
}

impl BitAnd for PlayerBitSet {
    type Output = PlayerBitSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            set: self.set & rhs.set,
        }
    }
}

pub struct ActivePlayerBitSetIter {
    set: u16,
}

impl Iterator for ActivePlayerBitSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.set == 0 {
            None
        } else {
            let idx = self.set.trailing_zeros() as usize;
            self.set &= !(1 << idx);
            Some(idx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_count() {
        assert_eq!(7, PlayerBitSet::new(7).count());
        assert_eq!(10, PlayerBitSet::new(10).count());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(PlayerBitSet::default().empty());
    }

    #[test]
    fn test_enable_disable() {
        let mut s = PlayerBitSet::default();
        s.enable(0);
        s.enable(0);
        s.enable(3);
        assert_eq!(2, s.count());
        assert!(s.get(3));
        s.disable(3);
        assert!(!s.get(3));
        assert_eq!(1, s.count());
    }

    #[test]
    fn test_and_or() {
        let mut a = PlayerBitSet::new(3);
        a.disable(1);
        let mut b = PlayerBitSet::default();
        b.enable(1);
        b.enable(2);
        assert_eq!(vec![2], (a & b).ones().collect::<Vec<_>>());
        assert_eq!(3, (a | b).count());
    }

    #[test]
    fn test_iter_skips_disabled() {
        let mut s = PlayerBitSet::new(4);
        s.disable(1);
        assert_eq!(vec![0, 2, 3], s.ones().collect::<Vec<_>>());
    }
}

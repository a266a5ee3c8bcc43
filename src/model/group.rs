use super::Period;
use std::fmt;

/// Number of destination groups.
pub const GROUP_COUNT: u32 = 23;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GroupId(pub usize);

#[derive(Clone, Debug)]
pub struct Group {
    pub id: GroupId,
    /// Group number as written in the output column, from 1 to 23.
    pub number: u32,
    pub capacity: usize,
}

impl Group {
    /// Build the 23 destination groups with their fixed capacities.
    pub fn standard_table() -> Vec<Group> {
        (1..=GROUP_COUNT)
            .zip(0..)
            .map(|(number, idx)| Group {
                id: GroupId(idx),
                number,
                capacity: capacity_of(number),
            })
            .collect()
    }

    pub fn accepts_period(&self, period: Period) -> bool {
        accepts_period(self.number, period)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {}", self.number)
    }
}

pub fn capacity_of(number: u32) -> usize {
    match number {
        1..=4 => 8,
        5..=22 => 7,
        _ => 6,
    }
}

pub fn is_shared(number: u32) -> bool {
    (1..=4).contains(&number)
}

pub fn accepts_period(number: u32, period: Period) -> bool {
    is_shared(number)
        || match period {
            Period::P1 => (17..=23).contains(&number),
            Period::P2 => (5..=16).contains(&number),
        }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let groups = Group::standard_table();
        assert_eq!(groups.len(), 23);
        assert_eq!(groups[0].number, 1);
        assert_eq!(groups[22].number, 23);
        assert_eq!(groups[22].id, GroupId(22));
        assert_eq!(
            groups.iter().map(|g| g.capacity).sum::<usize>(),
            4 * 8 + 18 * 7 + 6
        );
        assert_eq!(groups[3].capacity, 8);
        assert_eq!(groups[4].capacity, 7);
        assert_eq!(groups[21].capacity, 7);
        assert_eq!(groups[22].capacity, 6);
    }

    #[test]
    fn test_period_sets() {
        let p1 = (1..=GROUP_COUNT)
            .filter(|&n| accepts_period(n, Period::P1))
            .collect::<Vec<_>>();
        assert_eq!(p1, vec![1, 2, 3, 4, 17, 18, 19, 20, 21, 22, 23]);
        let p2 = (1..=GROUP_COUNT)
            .filter(|&n| accepts_period(n, Period::P2))
            .collect::<Vec<_>>();
        assert_eq!(p2, (1..=16).collect::<Vec<_>>());
        let both = (1..=GROUP_COUNT)
            .filter(|&n| accepts_period(n, Period::P1) && accepts_period(n, Period::P2))
            .collect::<Vec<_>>();
        assert_eq!(both, vec![1, 2, 3, 4]);
    }
}

//! Baggage allowances: per-passenger distribution and the bag option bounds

/// Cabin bags a single passenger may carry
pub const MAX_CABIN_PER_PASSENGER: u32 = 1;
/// Checked bags a single passenger may add
pub const MAX_CHECKED_PER_PASSENGER: u32 = 2;

/// Distribute `bags` greedily over `passengers`, at most `max_per_passenger`
/// each, and join the per-passenger counts with commas.
///
/// Bags beyond `passengers * max_per_passenger` are dropped.
pub fn format_bag_data(passengers: u32, bags: u32, max_per_passenger: u32) -> String {
    let mut remaining = bags;
    (0..passengers)
        .map(|_| {
            let take = remaining.min(max_per_passenger);
            remaining -= take;
            take.to_string()
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Bag totals split between the adult and child passenger groups
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BagSplit {
    pub adult_cabin: u32,
    pub adult_checked: u32,
    pub child_cabin: u32,
    pub child_checked: u32,
}

impl BagSplit {
    /// Adults are served first; children get whatever is left.
    pub fn new(adults: u32, cabin_bags: u32, checked_bags: u32) -> Self {
        let adult_cabin = cabin_bags.min(adults * MAX_CABIN_PER_PASSENGER);
        let adult_checked = checked_bags.min(adults * MAX_CHECKED_PER_PASSENGER);
        Self {
            adult_cabin,
            adult_checked,
            child_cabin: cabin_bags - adult_cabin,
            child_checked: checked_bags - adult_checked,
        }
    }
}

/// Upper bounds of the bag selectors for a passenger count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BagLimits {
    pub max_cabin: u32,
    pub max_checked: u32,
}

impl BagLimits {
    /// Infants travel without their own allowance, so only adults and children count.
    pub fn for_passengers(adults: u32, children: u32) -> Self {
        let passengers = adults + children;
        Self {
            max_cabin: passengers * MAX_CABIN_PER_PASSENGER,
            max_checked: passengers * MAX_CHECKED_PER_PASSENGER,
        }
    }
}

/// Keep the current selection when it is still offered, otherwise clamp it to the maximum.
pub fn clamp_selection(current: u32, max: u32) -> u32 {
    if current <= max {
        current
    } else {
        max
    }
}

/// The choices offered by a bag selector: `0..=max`
pub fn bag_options(max: u32) -> Vec<u32> {
    (0..=max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(data: &str) -> u32 {
        data.split(',').map(|n| n.parse::<u32>().unwrap()).sum()
    }

    #[test]
    fn test_format_bag_data_caps_per_passenger() {
        assert_eq!(format_bag_data(3, 5, 1), "1,1,1");
        assert_eq!(format_bag_data(3, 2, 1), "1,1,0");
        assert_eq!(format_bag_data(2, 3, 2), "2,1");
        assert_eq!(format_bag_data(2, 0, 2), "0,0");
        assert_eq!(format_bag_data(0, 4, 2), "");
    }

    #[test]
    fn test_format_bag_data_never_exceeds_bounds() {
        for passengers in 1..=6 {
            for bags in 0..=15 {
                for max in 1..=2 {
                    let data = format_bag_data(passengers, bags, max);
                    let total = sum(&data);
                    assert!(total <= bags);
                    assert!(total <= passengers * max);
                    assert_eq!(data.split(',').count() as u32, passengers);
                }
            }
        }
    }

    #[test]
    fn test_bag_split_serves_adults_first() {
        let split = BagSplit::new(2, 3, 5);
        assert_eq!(
            split,
            BagSplit {
                adult_cabin: 2,
                adult_checked: 4,
                child_cabin: 1,
                child_checked: 1,
            }
        );
    }

    #[test]
    fn test_limits_and_clamping() {
        let limits = BagLimits::for_passengers(2, 1);
        assert_eq!(limits.max_cabin, 3);
        assert_eq!(limits.max_checked, 6);

        assert_eq!(clamp_selection(2, 3), 2);
        assert_eq!(clamp_selection(5, 3), 3);
        assert_eq!(bag_options(2), vec![0, 1, 2]);
    }
}

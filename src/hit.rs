use crate::grid::Point;
use crate::targets::Target;

/// Outcome of a single pointer press against the active targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickVerdict {
    /// Slots of every target under the pointer, in slot order
    pub hit_slots: Vec<usize>,
}

impl ClickVerdict {
    pub fn is_miss(&self) -> bool {
        self.hit_slots.is_empty()
    }

    pub fn hits(&self) -> u32 {
        self.hit_slots.len() as u32
    }

    /// +1 per target hit, -1 for a click that hits nothing
    pub fn score_delta(&self) -> i64 {
        if self.is_miss() {
            -1
        } else {
            self.hit_slots.len() as i64
        }
    }
}

/// Inclusive: a pointer exactly `radius` away from the center is a hit
pub fn is_hit(pointer: Point, target: &Target) -> bool {
    pointer.distance(target.position) <= target.radius
}

/// Test the pointer against all targets. Overlapping targets are all hit.
pub fn resolve_click<'a, I>(pointer: Point, targets: I) -> ClickVerdict
where
    I: IntoIterator<Item = (usize, &'a Target)>,
{
    let hit_slots = targets
        .into_iter()
        .filter(|(_, target)| is_hit(pointer, target))
        .map(|(slot, _)| slot)
        .collect();

    ClickVerdict { hit_slots }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(x: f64, y: f64, radius: f64) -> Target {
        Target {
            position: Point::new(x, y),
            radius,
            cell: 0,
        }
    }

    #[test]
    fn test_boundary_counts_as_hit() {
        let t = target(0.0, 0.0, 5.0);
        assert!(is_hit(Point::new(3.0, 4.0), &t));
        assert!(is_hit(Point::new(5.0, 0.0), &t));
        assert!(!is_hit(Point::new(5.0, 0.001), &t));
    }

    #[test]
    fn test_center_is_hit() {
        assert!(is_hit(Point::new(50.0, 50.0), &target(50.0, 50.0, 1.0)));
    }

    #[test]
    fn test_miss_verdict() {
        let targets = [target(50.0, 50.0, 10.0), target(250.0, 50.0, 10.0)];
        let verdict = resolve_click(
            Point::new(150.0, 50.0),
            targets.iter().enumerate(),
        );

        assert!(verdict.is_miss());
        assert_eq!(verdict.hits(), 0);
        assert_eq!(verdict.score_delta(), -1);
    }

    #[test]
    fn test_single_hit_verdict() {
        let targets = [target(50.0, 50.0, 10.0), target(250.0, 50.0, 10.0)];
        let verdict = resolve_click(Point::new(255.0, 50.0), targets.iter().enumerate());

        assert_eq!(verdict.hit_slots, vec![1]);
        assert_eq!(verdict.score_delta(), 1);
    }

    #[test]
    fn test_overlapping_targets_all_hit() {
        let targets = [
            target(50.0, 50.0, 80.0),
            target(150.0, 50.0, 80.0),
            target(550.0, 50.0, 80.0),
        ];
        let verdict = resolve_click(Point::new(100.0, 50.0), targets.iter().enumerate());

        assert_eq!(verdict.hit_slots, vec![0, 1]);
        assert_eq!(verdict.hits(), 2);
        assert_eq!(verdict.score_delta(), 2);
    }

    #[test]
    fn test_no_targets_is_miss() {
        let verdict = resolve_click(Point::new(1.0, 1.0), std::iter::empty());
        assert!(verdict.is_miss());
    }
}

//! Collision detection between the character and live obstacles.
//!
//! Ground and elevated obstacles use inverted vertical rules: a ground
//! obstacle hits a character that has not risen off the ground line, an
//! elevated one hits a character whose head is up at or above its lower band.

use super::types::*;

/// The character's fixed horizontal band overlaps the obstacle.
pub fn overlaps_horizontally(character: &Character, obstacle: &Obstacle) -> bool {
    character.right() > obstacle.left() && character.left() < obstacle.right()
}

pub fn is_hit(character: &Character, obstacle: &Obstacle) -> bool {
    if !overlaps_horizontally(character, obstacle) {
        return false;
    }
    match obstacle.placement {
        Placement::Ground => character.bottom() > character.ground_line,
        Placement::Elevated => character.top() <= character.ground_line - obstacle.height,
    }
}

/// Index of the first obstacle hitting the character, if any.
pub fn first_hit(character: &Character, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|o| is_hit(character, o))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Viewport, Character) {
        let viewport = Viewport::new(1000.0, 500.0);
        let character = Character::for_viewport(&viewport);
        (viewport, character)
    }

    fn obstacle(x: f64, placement: Placement) -> Obstacle {
        Obstacle {
            x,
            y: 0.0,
            width: 50.0,
            height: 50.0,
            placement,
            variant: 0,
        }
    }

    #[test]
    fn test_horizontal_overlap_edges() {
        let (_, character) = setup();
        // Character spans [50, 130)
        assert!(!overlaps_horizontally(&character, &obstacle(130.0, Placement::Ground)));
        assert!(overlaps_horizontally(&character, &obstacle(129.9, Placement::Ground)));
        assert!(!overlaps_horizontally(&character, &obstacle(0.0, Placement::Ground)));
        assert!(overlaps_horizontally(&character, &obstacle(0.1, Placement::Ground)));
    }

    #[test]
    fn test_ground_obstacle_hits_grounded_character() {
        let (_, character) = setup();
        assert!(is_hit(&character, &obstacle(100.0, Placement::Ground)));
    }

    #[test]
    fn test_ground_obstacle_cleared_by_high_jump() {
        let (_, mut character) = setup();
        // Bottom exactly on the ground line: cleared
        character.y = character.ground_line - character.height;
        assert!(!is_hit(&character, &obstacle(100.0, Placement::Ground)));

        // A hair lower: hit
        character.y += 0.01;
        assert!(is_hit(&character, &obstacle(100.0, Placement::Ground)));
    }

    #[test]
    fn test_elevated_obstacle_misses_grounded_character() {
        let (_, character) = setup();
        assert!(!is_hit(&character, &obstacle(100.0, Placement::Elevated)));
    }

    #[test]
    fn test_elevated_obstacle_hits_high_character() {
        let (_, mut character) = setup();
        // Ground line 350, obstacle height 50: head at or above 300 is hit
        character.y = 300.0;
        assert!(is_hit(&character, &obstacle(100.0, Placement::Elevated)));
        character.y = 300.01;
        assert!(!is_hit(&character, &obstacle(100.0, Placement::Elevated)));
        character.y = character.jump_limit;
        assert!(is_hit(&character, &obstacle(100.0, Placement::Elevated)));
    }

    #[test]
    fn test_no_hit_without_horizontal_overlap() {
        let (_, mut character) = setup();
        assert!(!is_hit(&character, &obstacle(600.0, Placement::Ground)));
        character.y = character.jump_limit;
        assert!(!is_hit(&character, &obstacle(600.0, Placement::Elevated)));
    }

    #[test]
    fn test_first_hit_picks_earliest() {
        let (_, character) = setup();
        let obstacles = vec![
            obstacle(600.0, Placement::Ground),
            obstacle(100.0, Placement::Elevated),
            obstacle(90.0, Placement::Ground),
            obstacle(60.0, Placement::Ground),
        ];
        assert_eq!(first_hit(&character, &obstacles), Some(2));
        assert_eq!(first_hit(&character, &obstacles[..2]), None);
    }
}

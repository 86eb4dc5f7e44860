use rand::prelude::*;

use super::*;

/// Uniformly random placement that keeps the first opened cell safe whenever the board has room for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
    start: Position,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, start: Position) -> Self {
        Self { seed, start }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let total_cells = config.total_cells();
        let size = config.size();

        // optimize for full boards
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "Board already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_cells
                );
            }
            log::warn!("Cannot keep start cell {} safe, every cell is a mine", self.start);
            let mut layout = MineLayout::empty(size);
            for pos in iter_positions(size) {
                layout.place_mine(pos);
            }
            return layout;
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut layout = MineLayout::empty(size);
        while layout.mine_count() < config.mines {
            let pos = Position::new(rng.random_range(0..config.rows), rng.random_range(0..config.cols));
            if pos == self.start {
                continue;
            }
            layout.place_mine(pos);
        }

        log::debug!(
            "Placed {} mines on {}x{} board, seed {}, start {}",
            layout.mine_count(),
            config.rows,
            config.cols,
            self.seed,
            self.start
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_mine_count_and_spares_start() {
        let config = GameConfig::new(9, 9, 10).unwrap();
        for seed in 0..32 {
            let start = Position::new((seed % 9) as Coord, (seed / 4 % 9) as Coord);
            let layout = RandomMineGenerator::new(seed, start).generate(config);

            assert_eq!(layout.mine_count(), 10);
            assert_eq!(layout.iter_mines().count(), 10);
            assert!(!layout.contains_mine(start));
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::new(16, 30, 99).unwrap();
        let start = Position::new(8, 15);

        let first = RandomMineGenerator::new(42, start).generate(config);
        let second = RandomMineGenerator::new(42, start).generate(config);

        assert_eq!(first, second);
    }

    #[test]
    fn all_but_one_cell_mined_leaves_start_clear() {
        let config = GameConfig::new(3, 3, 8).unwrap();
        let start = Position::new(1, 1);

        let layout = RandomMineGenerator::new(7, start).generate(config);

        assert_eq!(layout.mine_count(), 8);
        assert!(!layout.contains_mine(start));
    }

    #[test]
    fn full_board_mines_every_cell() {
        let config = GameConfig::new(2, 2, 4).unwrap();

        let layout = RandomMineGenerator::new(1, Position::new(0, 0)).generate(config);

        assert_eq!(layout.mine_count(), 4);
        assert!(layout.contains_mine(Position::new(0, 0)));
    }

    #[test]
    fn zero_mines() {
        let config = GameConfig::new(4, 4, 0).unwrap();

        let layout = RandomMineGenerator::new(3, Position::new(2, 2)).generate(config);

        assert_eq!(layout.mine_count(), 0);
        assert_eq!(layout.iter_mines().count(), 0);
    }
}

//! Per-square move tables, built once on first use.
//!
//! Knight and king targets depend only on the square, and a slider ray only
//! needs to be walked until the first occupied square, so both are computed
//! up front and shared by every board.

use once_cell::sync::Lazy;

use crate::types::Square;

/// Row/column deltas of the eight ray directions. The first four are the rook
/// directions, the last four the bishop directions.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, -1),
    (1, 1),
    (1, -1),
];

pub const ROOK_DIRECTIONS: std::ops::Range<usize> = 0..4;
pub const BISHOP_DIRECTIONS: std::ops::Range<usize> = 4..8;
pub const QUEEN_DIRECTIONS: std::ops::Range<usize> = 0..8;

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub struct AttackTables {
    pub knight: Vec<Vec<Square>>,
    pub king: Vec<Vec<Square>>,
    /// `rays[square][direction]` lists squares outward from `square`, nearest first
    pub rays: Vec<[Vec<Square>; 8]>,
}

impl AttackTables {
    fn new() -> Self {
        let mut knight = Vec::with_capacity(64);
        let mut king = Vec::with_capacity(64);
        let mut rays = Vec::with_capacity(64);

        for sq in Square::all() {
            knight.push(
                KNIGHT_JUMPS
                    .iter()
                    .filter_map(|&(dr, dc)| sq.offset(dr, dc))
                    .collect(),
            );
            king.push(
                DIRECTIONS
                    .iter()
                    .filter_map(|&(dr, dc)| sq.offset(dr, dc))
                    .collect(),
            );
            rays.push(DIRECTIONS.map(|(dr, dc)| Self::ray_from(sq, dr, dc)));
        }

        Self { knight, king, rays }
    }

    fn ray_from(sq: Square, dr: i8, dc: i8) -> Vec<Square> {
        let mut ray = vec![];
        let mut current = sq;
        while let Some(next) = current.offset(dr, dc) {
            ray.push(next);
            current = next;
        }
        ray
    }

    pub fn knight_targets(&self, sq: Square) -> &[Square] {
        &self.knight[sq.index()]
    }

    pub fn king_targets(&self, sq: Square) -> &[Square] {
        &self.king[sq.index()]
    }

    pub fn ray(&self, sq: Square, direction: usize) -> &[Square] {
        &self.rays[sq.index()][direction]
    }
}

pub static ATTACK_TABLES: Lazy<AttackTables> = Lazy::new(AttackTables::new);

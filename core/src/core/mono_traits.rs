//! Zero-sized marker types used to monomorphise colour-dependent move
//! generation at compile time rather than branching on `Player` at runtime
//! inside the hot loop, the way `pleco::core::mono_traits` specialises
//! `PlayerTrait`.

use super::Player;

pub trait PlayerTrait {
    const PLAYER: Player;
    fn opp() -> Player {
        !Self::PLAYER
    }
}

pub struct WhiteType;
pub struct BlackType;

impl PlayerTrait for WhiteType {
    const PLAYER: Player = Player::White;
}

impl PlayerTrait for BlackType {
    const PLAYER: Player = Player::Black;
}

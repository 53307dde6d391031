//! Experience ledger: the single writer of player level and EXP.

mod access;
mod ledger;

pub use access::*;
pub use ledger::*;

use bevy::prelude::*;

pub struct ExperiencePlugin;

impl Plugin for ExperiencePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ExperienceLedger>()
            .register_type::<PlayerProgress>()
            .register_type::<RemainderPolicy>();
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared client services for Marquee tools (config, identity, favorites, prefs).
//! Keeps front ends thin: they render from [`favorites::FavoritesStore`] and
//! never decide which favorites backend to talk to.

pub mod config;
pub mod favorites;
pub mod identity;
pub mod memory;
pub mod prefs;

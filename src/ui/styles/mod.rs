// SPDX-License-Identifier: MPL-2.0
//! Centralized styles for the story strip and viewer.

pub mod button;
pub mod container;

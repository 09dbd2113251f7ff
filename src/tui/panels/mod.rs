// SPDX-License-Identifier: MIT
pub mod fixations;
pub mod header;
pub mod trace;

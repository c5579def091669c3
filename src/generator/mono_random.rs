/*
mono_random.rs

Copyright 2025 Hervé Quatremain

This file is part of Squares.

Squares is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Squares is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Squares. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Seeded random generator used to build the rule tables.
//!
//! Rule sets must be identical on every installation of the game, so the generator reproduces,
//! draw for draw, the subtractive generator of the host (Knuth's algorithm, as implemented by
//! the `System.Random` class of Mono).
//! The ambient randomness (layouts, delays) never uses this generator.

const MBIG: i32 = i32::MAX;
const MSEED: i32 = 161_803_398;

/// Subtractive random generator with a 56-slot state.
#[derive(Debug, Clone)]
pub struct MonoRandom {
    /// Seed the generator was created with.
    pub seed: i32,

    seed_array: [i32; 56],
    inext: usize,
    inextp: usize,
}

impl MonoRandom {
    /// Create a [`MonoRandom`] object.
    pub fn new(seed: i32) -> Self {
        let mut seed_array: [i32; 56] = [0; 56];
        let subtraction: i32 = if seed == i32::MIN {
            i32::MAX
        } else {
            seed.abs()
        };

        let mut mj: i32 = MSEED.wrapping_sub(subtraction);
        seed_array[55] = mj;
        let mut mk: i32 = 1;
        for i in 1..55 {
            let ii: usize = (21 * i) % 55;
            seed_array[ii] = mk;
            mk = mj.wrapping_sub(mk);
            if mk < 0 {
                mk = mk.wrapping_add(MBIG);
            }
            mj = seed_array[ii];
        }
        for _ in 1..5 {
            for i in 1..56 {
                seed_array[i] = seed_array[i].wrapping_sub(seed_array[1 + (i + 30) % 55]);
                if seed_array[i] < 0 {
                    seed_array[i] = seed_array[i].wrapping_add(MBIG);
                }
            }
        }

        Self {
            seed,
            seed_array,
            inext: 0,
            inextp: 31,
        }
    }

    fn sample(&mut self) -> f64 {
        self.inext += 1;
        if self.inext >= 56 {
            self.inext = 1;
        }
        self.inextp += 1;
        if self.inextp >= 56 {
            self.inextp = 1;
        }

        let mut value: i32 =
            self.seed_array[self.inext].wrapping_sub(self.seed_array[self.inextp]);
        if value < 0 {
            value = value.wrapping_add(MBIG);
        }
        self.seed_array[self.inext] = value;
        f64::from(value) * (1.0 / f64::from(MBIG))
    }

    /// Return a non-negative number lower than [`i32::MAX`].
    pub fn next(&mut self) -> i32 {
        (self.sample() * f64::from(i32::MAX)) as i32
    }

    /// Return a number in `0..max`.
    pub fn next_max(&mut self, max: i32) -> i32 {
        (self.sample() * f64::from(max)) as i32
    }

    /// Return a number in `min..max`.
    ///
    /// When the range holds a single value, no draw is consumed.
    pub fn next_range(&mut self, min: i32, max: i32) -> i32 {
        let diff: u32 = max.wrapping_sub(min) as u32;
        if diff <= 1 {
            return min;
        }
        ((self.sample() * f64::from(diff)) as u32 as i32).wrapping_add(min)
    }

    /// Return a number in `[0.0, 1.0)`.
    pub fn next_double(&mut self) -> f64 {
        self.sample()
    }

    /// Shuffle the slice in place with the Fisher-Yates algorithm.
    ///
    /// Successive calls on the same slice compose: the rule generators rely on that.
    pub fn shuffle_fisher_yates<T>(&mut self, list: &mut [T]) {
        let mut i: usize = list.len();
        while i > 1 {
            let j: usize = self.next_range(0, i as i32) as usize;
            i -= 1;
            list.swap(j, i);
        }
    }

    /// Consume draws from the generator without using them.
    pub fn skip(&mut self, count: usize) {
        for _ in 0..count {
            self.next();
        }
    }
}

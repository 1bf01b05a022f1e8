// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hashids v1 encoder over the default alphabet.
//!
//! Token issuers already hand out ids in this format, so the constants and
//! shuffling below must stay byte-compatible with the published algorithm.

use std::fmt;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";
const SEPARATORS: &[u8] = b"cfhistuCFHISTU";
const SEPARATOR_DIV: f64 = 3.5;
const GUARD_DIV: f64 = 12.0;

#[derive(Clone)]
pub(crate) struct Hashids {
	salt: Vec<u8>,
	min_length: usize,
	alphabet: Vec<u8>,
	separators: Vec<u8>,
	guards: Vec<u8>,
}

impl Hashids {
	pub(crate) fn new(salt: &str, min_length: usize) -> Self {
		let salt = salt.as_bytes().to_vec();

		let mut separators: Vec<u8> = SEPARATORS.to_vec();
		let mut alphabet: Vec<u8> = ALPHABET
			.iter()
			.copied()
			.filter(|c| !separators.contains(c))
			.collect();
		shuffle(&mut separators, &salt);

		if alphabet.len() as f64 / separators.len() as f64 > SEPARATOR_DIV {
			let wanted = ((alphabet.len() as f64 / SEPARATOR_DIV).ceil() as usize).max(2);
			if wanted > separators.len() {
				let diff = wanted - separators.len();
				separators.extend(alphabet.drain(..diff));
			} else {
				separators.truncate(wanted);
			}
		}

		shuffle(&mut alphabet, &salt);

		let guard_count = (alphabet.len() as f64 / GUARD_DIV).ceil() as usize;
		let guards = alphabet.drain(..guard_count).collect();

		Self {
			salt,
			min_length,
			alphabet,
			separators,
			guards,
		}
	}

	pub(crate) fn encode(&self, numbers: &[u64]) -> String {
		if numbers.is_empty() {
			return String::new();
		}

		let mut alphabet = self.alphabet.clone();
		let numbers_hash: u64 = numbers
			.iter()
			.enumerate()
			.map(|(i, n)| n % (i as u64 + 100))
			.sum();

		let lottery = alphabet[(numbers_hash % alphabet.len() as u64) as usize];
		let mut out = vec![lottery];

		for (i, &number) in numbers.iter().enumerate() {
			reshuffle(&mut alphabet, lottery, &self.salt);
			let last = hash(number, &alphabet);
			out.extend_from_slice(&last);

			if i + 1 < numbers.len() {
				let reduced = number % (u64::from(last[0]) + i as u64);
				let index = (reduced % self.separators.len() as u64) as usize;
				out.push(self.separators[index]);
			}
		}

		if out.len() < self.min_length {
			let index = ((numbers_hash + u64::from(out[0])) % self.guards.len() as u64) as usize;
			out.insert(0, self.guards[index]);

			if out.len() < self.min_length {
				let index = ((numbers_hash + u64::from(out[2])) % self.guards.len() as u64) as usize;
				out.push(self.guards[index]);
			}
		}

		let half = alphabet.len() / 2;
		while out.len() < self.min_length {
			let key = alphabet.clone();
			shuffle(&mut alphabet, &key);

			let mut padded = Vec::with_capacity(out.len() + alphabet.len());
			padded.extend_from_slice(&alphabet[half..]);
			padded.extend_from_slice(&out);
			padded.extend_from_slice(&alphabet[..half]);
			out = padded;

			if out.len() > self.min_length {
				let start = (out.len() - self.min_length) / 2;
				out = out[start..start + self.min_length].to_vec();
			}
		}

		// Every byte comes from the ASCII alphabet.
		out.into_iter().map(char::from).collect()
	}

	/// Returns `None` unless `token` is exactly what [`Hashids::encode`] would
	/// produce for the decoded numbers.
	pub(crate) fn decode(&self, token: &str) -> Option<Vec<u64>> {
		let bytes = token.as_bytes();
		let parts: Vec<&[u8]> = bytes.split(|c| self.guards.contains(c)).collect();
		let breakdown = match parts.len() {
			2 | 3 => parts[1],
			_ => parts[0],
		};

		let (&lottery, rest) = breakdown.split_first()?;
		let mut alphabet = self.alphabet.clone();
		let mut numbers = Vec::new();

		for chunk in rest.split(|c| self.separators.contains(c)) {
			reshuffle(&mut alphabet, lottery, &self.salt);
			numbers.push(unhash(chunk, &alphabet)?);
		}

		if self.encode(&numbers) != token {
			return None;
		}

		Some(numbers)
	}
}

impl fmt::Debug for Hashids {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hashids")
			.field("salt", &"[REDACTED]")
			.field("min_length", &self.min_length)
			.finish_non_exhaustive()
	}
}

fn reshuffle(alphabet: &mut [u8], lottery: u8, salt: &[u8]) {
	let mut buffer = Vec::with_capacity(1 + salt.len() + alphabet.len());
	buffer.push(lottery);
	buffer.extend_from_slice(salt);
	buffer.extend_from_slice(alphabet);
	buffer.truncate(alphabet.len());
	shuffle(alphabet, &buffer);
}

fn shuffle(values: &mut [u8], salt: &[u8]) {
	if salt.is_empty() {
		return;
	}

	let mut v = 0usize;
	let mut p = 0usize;
	for i in (1..values.len()).rev() {
		v %= salt.len();
		let integer = usize::from(salt[v]);
		p += integer;
		let j = (integer + v + p) % i;
		values.swap(i, j);
		v += 1;
	}
}

fn hash(mut number: u64, alphabet: &[u8]) -> Vec<u8> {
	let len = alphabet.len() as u64;
	let mut out = Vec::new();
	loop {
		out.push(alphabet[(number % len) as usize]);
		number /= len;
		if number == 0 {
			break;
		}
	}
	out.reverse();
	out
}

fn unhash(input: &[u8], alphabet: &[u8]) -> Option<u64> {
	let len = alphabet.len() as u64;
	input.iter().try_fold(0u64, |acc, c| {
		let position = alphabet.iter().position(|a| a == c)? as u64;
		acc.checked_mul(len)?.checked_add(position)
	})
}

// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Normalization of arbitrary upstream strings into metric and label
//! identifiers safe for the text exposition format.

/// Substitutions applied in order. The table is a fixed list so results are
/// deterministic regardless of input.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\\', ""),
    ('"', ""),
    ('\n', ""),
    ('\t', ""),
    ('\r', ""),
    ('-', "_"),
    (' ', "_"),
];

/// Sanitize a raw string for use as a metric name, label key, or label value.
///
/// Total and pure: never fails, and sanitizing an already-clean string
/// returns it unchanged.
pub fn sanitize(raw: &str) -> String {
    let mut out = raw.to_string();
    for (from, to) in SUBSTITUTIONS {
        out = out.replace(*from, to);
    }
    out
}

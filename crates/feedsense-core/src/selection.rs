// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process anti-join used by stores that cannot express it as a query.

use std::collections::HashSet;

use crate::types::{FeedbackRow, IdentityKey};

/// Returns the source rows whose identity key is not in `processed`, in source order.
///
/// Duplicate keys inside the source itself are kept: they are distinct
/// source events until one of them has been written to the output store.
pub fn select_unprocessed<I>(source: I, processed: &HashSet<IdentityKey>) -> Vec<FeedbackRow>
where
    I: IntoIterator<Item = FeedbackRow>,
{
    source
        .into_iter()
        .filter(|row| !processed.contains(&row.identity_key()))
        .collect()
}

//! Folding of pairs into nested values, following the bracket-path syntax
//! of PHP's `parse_str` (`a[b][]=c`).
//!
//! Unlike `parse_str`, key names are never mangled: dots and spaces in keys
//! are kept as they are.

use crate::Pair;
use crate::config::Config;
use crate::error::Result;
use crate::parse::parse_query;
use crate::scalar::Scalar;
use crate::value::NestedMap;

/// Parses a query string and folds its pairs into a [`NestedMap`].
pub fn extract_query(query: Option<&str>, config: Config<'_>) -> Result<NestedMap> {
    let pairs = parse_query(query, config)?;
    let extracted = fold_pairs(pairs);
    tracing::trace!(entries = extracted.len(), "extracted query string");
    Ok(extracted)
}

/// Folds already parsed pairs into a [`NestedMap`].
///
/// Keys without a value are stored with an empty string.
pub fn convert<'a, I, K, V>(pairs: I) -> NestedMap
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<Scalar<'a>>,
    V: Into<Scalar<'a>>,
{
    fold_pairs(pairs.into_iter().map(|(key, value)| {
        (
            key.into().into_string(),
            value.map(|v| v.into().into_string()),
        )
    }))
}

fn fold_pairs<I: IntoIterator<Item = Pair>>(pairs: I) -> NestedMap {
    let mut root = NestedMap::new();
    for (key, value) in pairs {
        fold_pair(&mut root, key, value.unwrap_or_default());
    }
    root
}

/// Stores `value` under the bracket path `name`.
///
/// `base[index]rest` descends into `base` (turning it into a map if needed)
/// and then:
/// - appends at the next free index if `index` is empty,
/// - continues with the name `index` + `rest` if `rest` is itself a
///   bracketed segment (`[...]`),
/// - otherwise stores at `index`, ignoring whatever follows.
///
/// Names without a complete `[...]` segment are stored verbatim.
fn fold_pair(root: &mut NestedMap, name: String, value: String) {
    if name.is_empty() {
        return;
    }

    let mut node = root;
    let mut name = name;
    loop {
        let Some(left) = name.find('[') else {
            node.insert(name, value);
            return;
        };
        let Some(right) = name[left..].find(']').map(|offset| left + offset) else {
            node.insert(name, value);
            return;
        };

        let children = node.child_map(&name[..left]);
        let index = &name[left + 1..right];
        if index.is_empty() {
            if children.push(value).is_none() {
                tracing::debug!(name = %name, "no free index left to append to");
            }
            return;
        }

        let rest = &name[right + 1..];
        if !(rest.starts_with('[') && rest[1..].contains(']')) {
            // truncated path
            children.insert(index, value);
            return;
        }

        let next = format!("{index}{rest}");
        node = children;
        name = next;
    }
}

/// Sort Engine: the two comparison-driven sorting algorithms.
///
/// Both consume an [`Oracle`] and know nothing about caching, logging, or
/// replay — that is layered on top by the session. An oracle that cannot
/// answer yet returns [`Suspended`], which unwinds the whole sort via `?`;
/// the session later re-runs it with the new answer recorded.
///
/// Pairwise mode is a stable top-down merge sort; triwise mode is a ternary
/// insertion sort that asks three-way questions to cut the insertion search
/// to O(log3 n) per item.
use crate::types::{Item, ItemId, Outcome};

/// Marker returned by an oracle that has no answer yet. The current sort
/// pass stops at that question; nothing about the pass is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suspended;

/// The decision-making entity answering comparison questions.
///
/// Deterministic oracles (tests, scripted replays) answer immediately and
/// never return [`Suspended`]. The interactive session's oracle serves
/// recorded answers and suspends on the first genuinely new question.
pub trait Oracle {
    /// Order two items. `Greater` means `a` ranks higher.
    fn compare(&mut self, a: &Item, b: &Item) -> Result<Outcome, Suspended>;

    /// Rank three items best to worst. The result must be a permutation of
    /// the three ids; ties are not expressible.
    fn rank3(&mut self, a: &Item, b: &Item, c: &Item) -> Result<[ItemId; 3], Suspended>;

    /// Called after every completed engine mutation (a merge, a splice)
    /// with the group's current order. Default: ignore.
    fn on_step(&mut self, _arr: &[Item]) {}
}

/// Stable merge sort driven by two-item questions.
///
/// Ties keep the left element, so an all-tie oracle returns the input
/// order unchanged for any length.
pub fn merge_sort(arr: &mut [Item], oracle: &mut impl Oracle) -> Result<(), Suspended> {
    if arr.len() > 1 {
        sort_range(arr, 0, arr.len() - 1, oracle)?;
    }
    Ok(())
}

fn sort_range(
    arr: &mut [Item],
    low: usize,
    high: usize,
    oracle: &mut impl Oracle,
) -> Result<(), Suspended> {
    if low >= high {
        return Ok(());
    }
    let mid = low + (high - low) / 2;
    sort_range(arr, low, mid, oracle)?;
    sort_range(arr, mid + 1, high, oracle)?;
    merge(arr, low, mid, high, oracle)?;
    oracle.on_step(arr);
    Ok(())
}

/// Merge the sorted runs `[low, mid]` and `[mid+1, high]` in place.
fn merge(
    arr: &mut [Item],
    low: usize,
    mid: usize,
    high: usize,
    oracle: &mut impl Oracle,
) -> Result<(), Suspended> {
    let left: Vec<Item> = arr[low..=mid].to_vec();
    let right: Vec<Item> = arr[mid + 1..=high].to_vec();
    let mut i = 0;
    let mut j = 0;
    let mut k = low;

    while i < left.len() && j < right.len() {
        if oracle.compare(&left[i], &right[j])?.prefers_first() {
            arr[k] = left[i].clone();
            i += 1;
        } else {
            arr[k] = right[j].clone();
            j += 1;
        }
        k += 1;
    }
    while i < left.len() {
        arr[k] = left[i].clone();
        i += 1;
        k += 1;
    }
    while j < right.len() {
        arr[k] = right[j].clone();
        j += 1;
        k += 1;
    }
    Ok(())
}

/// Ternary insertion sort driven by three-item questions.
///
/// Grows a sorted prefix; each new item's insertion index is found by a
/// ternary search that asks the oracle to rank the item against the
/// elements at the third boundaries of the candidate range.
pub fn ternary_insertion_sort(
    arr: &mut Vec<Item>,
    oracle: &mut impl Oracle,
) -> Result<(), Suspended> {
    for i in 1..arr.len() {
        let index = find_insert_index(&arr[..i], &arr[i], 0, i as isize - 1, oracle)?;
        let item = arr.remove(i);
        arr.insert(index as usize, item);
        oracle.on_step(arr);
    }
    Ok(())
}

/// Insertion index for `item` into the sorted `prefix`, searching positions
/// `low ..= high + 1` by comparing against `prefix[low ..= high]`.
///
/// Ranges of one element need a single two-item question; ranges of two
/// elements are resolved exactly by one three-way question (the ternary
/// split would degenerate there).
fn find_insert_index(
    prefix: &[Item],
    item: &Item,
    low: isize,
    high: isize,
    oracle: &mut impl Oracle,
) -> Result<isize, Suspended> {
    if high < low {
        return Ok(low);
    }

    if high == low {
        let outcome = oracle.compare(item, &prefix[low as usize])?;
        return Ok(if outcome.prefers_first() { low } else { low + 1 });
    }

    if high == low + 1 {
        let ranked = oracle.rank3(item, &prefix[low as usize], &prefix[high as usize])?;
        return Ok(if ranked[0] == item.id {
            low
        } else if ranked[1] == item.id {
            low + 1
        } else {
            low + 2
        });
    }

    let third = (high - low) / 3;
    let one_third = low + third;
    let two_thirds = high - third;

    let ranked = oracle.rank3(
        item,
        &prefix[one_third as usize],
        &prefix[two_thirds as usize],
    )?;

    if ranked[0] == item.id {
        // Above the first pivot.
        find_insert_index(prefix, item, low, one_third - 1, oracle)
    } else if ranked[1] == item.id {
        // Between the pivots.
        find_insert_index(prefix, item, one_third + 1, two_thirds - 1, oracle)
    } else {
        // Below the second pivot.
        find_insert_index(prefix, item, two_thirds + 1, high, oracle)
    }
}

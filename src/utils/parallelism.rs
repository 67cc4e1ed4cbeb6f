//! Helpers to make batch operations optionally parallel, depending on the
//! `WORDPIECE_TOKENIZERS_PARALLELISM` environment variable.

use rayon::prelude::*;
use rayon_cond::CondIterator;

pub const ENV_VARIABLE: &str = "WORDPIECE_TOKENIZERS_PARALLELISM";

/// Get the currently set value of the parallelism env variable. Defaults to
/// parallel when unset.
pub fn get_parallelism() -> bool {
    match std::env::var(ENV_VARIABLE) {
        Ok(mut value) => {
            value.make_ascii_lowercase();
            !matches!(value.as_ref(), "" | "off" | "false" | "f" | "no" | "n" | "0")
        }
        Err(_) => true,
    }
}

/// Set the parallelism env variable for the current process
pub fn set_parallelism(value: bool) {
    std::env::set_var(ENV_VARIABLE, if value { "true" } else { "false" })
}

/// Converts a collection into an iterator running either parallelly or
/// serially, depending on the current parallelism setting
pub trait MaybeParallelIterator<P, S>
where
    P: ParallelIterator,
    S: Iterator<Item = P::Item>,
{
    fn into_maybe_par_iter(self) -> CondIterator<P, S>;
    fn into_maybe_par_iter_cond(self, cond: bool) -> CondIterator<P, S>;
}

impl<P, S, I> MaybeParallelIterator<P, S> for I
where
    I: IntoParallelIterator<Iter = P, Item = P::Item> + IntoIterator<IntoIter = S, Item = S::Item>,
    P: ParallelIterator,
    S: Iterator<Item = P::Item>,
{
    fn into_maybe_par_iter(self) -> CondIterator<P, S> {
        CondIterator::new(self, get_parallelism())
    }

    fn into_maybe_par_iter_cond(self, cond: bool) -> CondIterator<P, S> {
        if cond {
            self.into_maybe_par_iter()
        } else {
            CondIterator::from_serial(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_iterators_agree() {
        let serial: Vec<u32> = vec![1u32, 2, 3]
            .into_maybe_par_iter_cond(false)
            .map(|i| i * 2)
            .collect();
        let parallel: Vec<u32> = vec![1u32, 2, 3]
            .into_maybe_par_iter_cond(true)
            .map(|i| i * 2)
            .collect();
        assert_eq!(serial, parallel);
    }
}

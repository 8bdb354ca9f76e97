/// Pick the row limit for a list command.
///
/// The command's own `--limit` wins over the global flag, which wins over the
/// configured default. A zero at either flag level is treated as unset.
#[must_use]
pub fn effective_limit(command: Option<u32>, global: Option<u32>, configured: u32) -> u32 {
    [command, global]
        .into_iter()
        .flatten()
        .find(|&n| n > 0)
        .unwrap_or(configured)
}

#[cfg(test)]
mod tests {
    use super::effective_limit;

    #[test]
    fn command_flag_wins() {
        assert_eq!(effective_limit(Some(3), Some(40), 20), 3);
    }

    #[test]
    fn global_flag_beats_config() {
        assert_eq!(effective_limit(None, Some(40), 20), 40);
    }

    #[test]
    fn config_is_the_last_resort() {
        assert_eq!(effective_limit(None, None, 25), 25);
    }

    #[test]
    fn zero_counts_as_unset() {
        assert_eq!(effective_limit(Some(0), Some(7), 20), 7);
        assert_eq!(effective_limit(Some(0), None, 20), 20);
    }
}

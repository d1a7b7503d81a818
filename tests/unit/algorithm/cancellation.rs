//! Tests for the shared cancellation flag

#[cfg(test)]
mod tests {
    use photomosaic::algorithm::cancellation::CancellationToken;
    use std::thread;

    // Tests new tokens start uncancelled
    // Verified by initializing the flag to true
    #[test]
    fn test_new_token_is_not_cancelled() {
        assert!(!CancellationToken::new().is_cancelled());
        assert!(!CancellationToken::default().is_cancelled());
    }

    // Tests clones observe cancellation
    // Verified by cloning the inner flag by value
    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    // Tests cancellation crosses threads
    // Verified by using a thread-local flag
    #[test]
    fn test_cancel_from_other_thread() {
        let token = CancellationToken::new();
        let remote = token.clone();
        thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }
}

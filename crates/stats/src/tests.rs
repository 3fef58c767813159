use super::*;

#[test]
fn window_mean_is_zero_when_empty() {
    let w = Window::new(4);
    assert_eq!(w.mean(), 0.0);
    assert!(!w.full());
}

#[test]
fn window_tracks_running_mean_until_full() {
    let mut w = Window::new(3);
    w.push(1.0);
    w.push(2.0);
    assert!(!w.full());
    assert_eq!(w.mean(), 1.5);
    w.push(3.0);
    assert!(w.full());
    assert_eq!(w.mean(), 2.0);
}

#[test]
fn window_evicts_oldest_once_full() {
    let mut w = Window::new(2);
    w.push(10.0);
    w.push(20.0);
    w.push(30.0); // evicts 10.0
    assert_eq!(w.len(), 2);
    assert_eq!(w.mean(), 25.0);
}

#[test]
#[should_panic(expected = "positive")]
fn window_rejects_zero_capacity() {
    let _ = Window::new(0);
}

#[test]
fn trailing_mean_on_empty_history_is_zero() {
    assert_eq!(trailing_mean(&[], 5), 0.0);
}

#[test]
fn trailing_mean_takes_last_window_elements() {
    let history = vec![0usize, 1, 1, 1, 5];
    // last 2: [1, 5] -> mean 3.0
    assert_eq!(trailing_mean(&history, 2), 3.0);
}

#[test]
fn trailing_mean_zero_window_means_entire_history() {
    let history = vec![2usize, 4, 6];
    assert_eq!(trailing_mean(&history, 0), 4.0);
}

#[test]
fn trailing_mean_window_larger_than_history_uses_all() {
    let history = vec![3usize, 3, 3];
    assert_eq!(trailing_mean(&history, 100), 3.0);
}

#[test]
fn trailing_mean_f64_on_empty_history_is_zero() {
    assert_eq!(trailing_mean_f64(&[], 5), 0.0);
}

#[test]
fn trailing_mean_f64_takes_last_window_elements() {
    let history = vec![0.5, 1.0, 1.0, 2.0];
    // last 2: [1.0, 2.0] -> mean 1.5
    assert_eq!(trailing_mean_f64(&history, 2), 1.5);
}

#[test]
fn trailing_mean_f64_zero_window_means_entire_history() {
    let history = vec![2.0, 4.0, 6.0];
    assert_eq!(trailing_mean_f64(&history, 0), 4.0);
}

mod common;

use common::*;
use embedded_hal_mock::delay::MockNoop;
use embedded_hal_mock::MockError;
use max86150::{Channels, Error, Sample};
use std::io::ErrorKind;

#[test]
fn empty_fifo_reads_only_pointers() {
    let mut dev = driver(&pointers(7, 7));

    assert_eq!(dev.drain().unwrap(), 0);
    assert_eq!(dev.available(), 0);

    finish(dev);
}

#[test]
fn two_records_in_one_burst() {
    let mut expectations = pointers(0, 2);
    expectations.push(select_fifo_data());
    expectations.push(burst(records(1, 2)));
    let mut dev = driver(&expectations);

    assert_eq!(dev.drain().unwrap(), 2);
    assert_eq!(dev.available(), 2);
    assert_eq!(dev.fifo_red(), Some(1));
    assert_eq!(dev.fifo_ir(), Some(0x101));
    assert_eq!(dev.fifo_ecg(), Some(-1));
    assert_eq!(dev.samples().peek_head().map(|s| s.red), Some(2));

    finish(dev);
}

#[test]
fn bursts_are_trimmed_to_whole_records() {
    let data = records(0, 10);
    let mut expectations = pointers(0, 10);
    expectations.push(select_fifo_data());
    expectations.push(burst(data[..63].to_vec()));
    expectations.push(burst(data[63..].to_vec()));
    let mut dev = driver(&expectations);

    assert_eq!(dev.drain().unwrap(), 10);
    assert_eq!(dev.available(), 10);

    for i in 0..10 {
        assert_eq!(dev.fifo_red(), Some(i));
        assert_eq!(dev.fifo_ecg(), Some(-(i as i32)));
        dev.next_sample();
    }
    assert_eq!(dev.available(), 0);

    finish(dev);
}

#[test]
fn pointer_distance_wraps_at_fifo_depth() {
    let mut expectations = pointers(30, 2);
    expectations.push(select_fifo_data());
    expectations.push(burst(records(0, 4)));
    let mut dev = driver(&expectations);

    assert_eq!(dev.drain().unwrap(), 4);
    assert_eq!(dev.available(), 4);

    finish(dev);
}

#[test]
fn smaller_bus_buffer_with_two_channels() {
    let data: Vec<u8> = (0..8u32)
        .flat_map(|i| {
            let mut r = record(i, 0x7FFFF, 0);
            r.truncate(6);
            r
        })
        .collect();

    let mut expectations = vec![write_reg(0x09, 0x21), write_reg(0x0A, 0x00)];
    expectations.extend(pointers(4, 12));
    expectations.push(select_fifo_data());
    expectations.push(burst(data[..30].to_vec()));
    expectations.push(burst(data[30..].to_vec()));
    let mut dev = driver(&expectations);

    dev.set_channels(Channels::RedIr).unwrap();
    dev.set_bus_buffer_len(32).unwrap();
    assert_eq!(dev.drain().unwrap(), 8);

    let last = dev.samples().peek_head().copied();
    assert_eq!(last, Some(Sample { red: 7, ir: Some(0x7FFFF), ecg: None }));

    finish(dev);
}

#[test]
fn red_and_ir_reserved_bits_are_dropped() {
    let mut expectations = pointers(0, 1);
    expectations.push(select_fifo_data());
    expectations.push(burst(vec![0xF9, 0x23, 0x45, 0xFF, 0xFF, 0xFF, 0x80, 0x00, 0x00]));
    let mut dev = driver(&expectations);

    dev.drain().unwrap();
    assert_eq!(dev.fifo_red(), Some(0x12345));
    assert_eq!(dev.fifo_ir(), Some(0x7FFFF));
    assert_eq!(dev.fifo_ecg(), Some(-0x80_0000));

    finish(dev);
}

#[test]
fn pointer_read_failure_is_not_an_empty_fifo() {
    let mut dev = driver(&[
        read_reg(FIFO_READ_PTR, 0).with_error(MockError::Io(ErrorKind::Other)),
    ]);

    assert!(matches!(dev.drain(), Err(Error::I2c(_))));

    finish(dev);
}

#[test]
fn burst_read_failure_propagates() {
    let mut expectations = pointers(0, 1);
    expectations.push(select_fifo_data());
    expectations.push(burst(vec![0; 9]).with_error(MockError::Io(ErrorKind::Other)));
    let mut dev = driver(&expectations);

    assert!(matches!(dev.drain(), Err(Error::I2c(_))));
    assert_eq!(dev.available(), 0);

    finish(dev);
}

#[test]
fn poll_gives_up_after_timeout() {
    let expectations: Vec<_> = (0..6).flat_map(|_| pointers(3, 3)).collect();
    let mut dev = driver(&expectations);
    let mut delay = CountingDelay::default();

    assert!(!dev.poll_until_available(&mut delay, 5).unwrap());
    assert_eq!(delay.total_ms, 5);
    assert_eq!(delay.calls, 5);

    finish(dev);
}

#[test]
fn poll_with_zero_timeout_tries_once() {
    let mut dev = driver(&pointers(0, 0));
    let mut delay = CountingDelay::default();

    assert!(!dev.poll_until_available(&mut delay, 0).unwrap());
    assert_eq!(delay.calls, 0);

    finish(dev);
}

#[test]
fn poll_returns_once_data_arrives() {
    let mut expectations = pointers(0, 0);
    expectations.extend(pointers(0, 0));
    expectations.extend(pointers(0, 1));
    expectations.push(select_fifo_data());
    expectations.push(burst(record(42, 43, -44)));
    let mut dev = driver(&expectations);
    let mut delay = CountingDelay::default();

    assert!(dev.poll_until_available(&mut delay, 250).unwrap());
    assert_eq!(delay.calls, 2);
    assert_eq!(dev.available(), 1);

    finish(dev);
}

#[test]
fn latest_value_comes_from_head() {
    let mut expectations = pointers(0, 3);
    expectations.push(select_fifo_data());
    expectations.push(burst(records(10, 3)));
    let mut dev = driver(&expectations);

    assert_eq!(dev.red(&mut MockNoop::new()).unwrap(), Some(12));
    assert_eq!(dev.fifo_red(), Some(10));
    assert_eq!(dev.available(), 3);

    finish(dev);
}

#[test]
fn latest_value_is_none_without_new_data() {
    let expectations: Vec<_> = (0..251).flat_map(|_| pointers(3, 3)).collect();
    let mut dev = driver(&expectations);
    let mut delay = CountingDelay::default();

    assert_eq!(dev.ecg(&mut delay).unwrap(), None);
    assert_eq!(delay.total_ms, 250);

    finish(dev);
}

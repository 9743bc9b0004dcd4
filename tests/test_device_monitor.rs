//! Integration tests for the device monitor and hotplug machinery.

use std::time::Duration;

use remapd::monitor::mock::{MockBackend, MockDeviceData};
use remapd::monitor::{DeviceData, DeviceState};
use remapd::{DeviceMonitor, HotplugEvent, HotplugFilter, MonitorWatcher};

fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

fn monitor_with_mock() -> (DeviceMonitor, remapd::monitor::mock::MockDeviceList) {
    let (backend, devices) = MockBackend::new();
    let mut monitor = DeviceMonitor::new();
    monitor.add_backend(Box::new(backend));
    (monitor, devices)
}

#[test]
fn rescan_reports_added_then_known_then_removed() {
    init_logging();
    let (mut monitor, devices) = monitor_with_mock();

    // Nothing connected yet
    assert!(monitor.rescan().is_empty());
    assert_eq!(monitor.device_count(), 0);

    devices
        .lock()
        .unwrap()
        .push(MockDeviceData::new("mock0", 0).with_ids(0x057e, 0x2009));

    let events = monitor.rescan();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], HotplugEvent::Added(d) if d.path() == "mock0"));
    assert_eq!(monitor.device_state("mock", "mock0"), Some(DeviceState::New));

    // Second sighting promotes the entry, with no event
    assert!(monitor.rescan().is_empty());
    assert_eq!(monitor.device_state("mock", "mock0"), Some(DeviceState::Known));
    assert_eq!(monitor.device_count(), 1);

    // Unplug
    devices.lock().unwrap().clear();
    let events = monitor.rescan();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], HotplugEvent::Removed(d) if d.path() == "mock0"));

    // The entry is gone, not lingering in a removed state
    assert_eq!(monitor.device_state("mock", "mock0"), None);
    assert_eq!(monitor.device_count(), 0);
}

#[test]
fn replug_within_one_cycle_is_removed_then_added() {
    init_logging();
    let (mut monitor, devices) = monitor_with_mock();

    devices.lock().unwrap().push(MockDeviceData::new("mock0", 0));
    monitor.rescan();
    monitor.rescan();
    assert_eq!(monitor.device_state("mock", "mock0"), Some(DeviceState::Known));

    // Same path reappears after an absent scan as a fresh New entry
    devices.lock().unwrap().clear();
    monitor.rescan();
    devices.lock().unwrap().push(MockDeviceData::new("mock0", 0));
    let events = monitor.rescan();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], HotplugEvent::Added(_)));
    assert_eq!(monitor.device_state("mock", "mock0"), Some(DeviceState::New));
}

#[test]
fn filters_match_each_criterion() {
    init_logging();
    let device = MockDeviceData::new("mock3", 3)
        .with_ids(0x057e, 0x2009)
        .with_name("Pro Controller")
        .with_guid("030000007e0500000920000000000000");

    let matching = [
        HotplugFilter::Vendor(0x057e),
        HotplugFilter::Product(0x2009),
        HotplugFilter::Index(3),
        HotplugFilter::Name("Pro Controller".to_string()),
        HotplugFilter::Guid("030000007e0500000920000000000000".to_string()),
    ];
    for filter in &matching {
        assert!(
            DeviceMonitor::test_filter(&device, filter),
            "filter {:?} should match",
            filter
        );
    }

    assert!(!DeviceMonitor::test_filter(&device, &HotplugFilter::Vendor(0x054c)));
    assert!(!DeviceMonitor::test_filter(&device, &HotplugFilter::Index(4)));
    assert!(!DeviceMonitor::test_filter(
        &device,
        &HotplugFilter::Name("DualShock".to_string())
    ));
}

#[test]
fn filter_on_unreported_field_is_false_not_an_error() {
    init_logging();
    // Bare record: no vendor/product/name/guid at all
    let device = MockDeviceData::new("mock0", 0);

    assert!(!DeviceMonitor::test_filter(&device, &HotplugFilter::Vendor(0x057e)));
    assert!(!DeviceMonitor::test_filter(&device, &HotplugFilter::Product(0x2009)));
    assert!(!DeviceMonitor::test_filter(
        &device,
        &HotplugFilter::Name("anything".to_string())
    ));
    assert!(!DeviceMonitor::test_filter(
        &device,
        &HotplugFilter::Guid("0300".to_string())
    ));
}

#[test]
fn find_device_walks_the_registry() {
    init_logging();
    let (mut monitor, devices) = monitor_with_mock();
    {
        let mut list = devices.lock().unwrap();
        list.push(MockDeviceData::new("mock0", 0).with_ids(0x054c, 0x09cc));
        list.push(MockDeviceData::new("mock1", 1).with_ids(0x057e, 0x2009));
    }
    monitor.rescan();

    let found = monitor
        .find_device(&HotplugFilter::Vendor(0x057e))
        .expect("device should be tracked");
    assert_eq!(found.path(), "mock1");
    assert_eq!(found.product(), Some(0x2009));

    assert!(monitor.find_device(&HotplugFilter::Vendor(0x28de)).is_none());
    monitor.close();
}

#[test]
fn filters_deserialize_from_config() {
    init_logging();

    #[derive(serde::Deserialize)]
    struct Config {
        filter: Vec<HotplugFilter>,
    }

    let config: Config = toml::from_str(
        r#"
        [[filter]]
        vendor = 1406

        [[filter]]
        name = "Pro Controller"
        "#,
    )
    .expect("filter config should parse");

    assert_eq!(config.filter[0], HotplugFilter::Vendor(0x057e));
    assert_eq!(config.filter[1], HotplugFilter::Name("Pro Controller".to_string()));

    let device = MockDeviceData::new("mock0", 0)
        .with_ids(0x057e, 0x2009)
        .with_name("Pro Controller");
    for filter in &config.filter {
        assert!(DeviceMonitor::test_filter(&device, filter));
    }
}

#[test]
fn cloned_records_outlive_the_registry() {
    init_logging();
    let (mut monitor, devices) = monitor_with_mock();
    devices
        .lock()
        .unwrap()
        .push(MockDeviceData::new("mock0", 0).with_name("Test Pad"));
    monitor.rescan();

    let copy = monitor
        .find_device(&HotplugFilter::Index(0))
        .expect("tracked")
        .clone_data();

    // Unplug and evict, then the copy still answers
    devices.lock().unwrap().clear();
    monitor.rescan();
    assert_eq!(monitor.device_count(), 0);
    assert_eq!(copy.name().as_deref(), Some("Test Pad"));
    assert!(copy.open().is_ok());
}

#[test]
fn watcher_publishes_hotplug_events() {
    init_logging();
    let (mut monitor, devices) = monitor_with_mock();
    devices
        .lock()
        .unwrap()
        .push(MockDeviceData::new("mock0", 0).with_ids(0x057e, 0x2009));

    // Device is connected before the thread starts, so the first rescan
    // publishes it
    let (watcher, events) =
        MonitorWatcher::spawn(monitor, Duration::from_millis(10)).expect("spawn watcher");
    assert!(watcher.is_running());

    let event = events
        .recv_timeout(Duration::from_secs(5))
        .expect("added event");
    assert!(matches!(&event, HotplugEvent::Added(d) if d.path() == "mock0"));

    devices.lock().unwrap().clear();
    let event = events
        .recv_timeout(Duration::from_secs(5))
        .expect("removed event");
    assert!(matches!(&event, HotplugEvent::Removed(_)));

    monitor = watcher.stop().expect("monitor handed back");
    assert_eq!(monitor.device_count(), 0);
}

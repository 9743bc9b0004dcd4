//! Off-loop rescan thread.
//!
//! Hardware enumeration can take backend-dependent time, so it does not
//! belong on the control loop. The watcher owns the monitor on a dedicated
//! thread, rescans on an interval and publishes hotplug events over a
//! bounded channel the daemon drains at its own pace.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{info, warn};

use super::{DeviceMonitor, HotplugEvent};

/// Background rescan thread handle.
pub struct MonitorWatcher {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<DeviceMonitor>>,
}

impl MonitorWatcher {
    /// Moves `monitor` onto a named thread that rescans every `interval`
    /// and publishes events. Returns the watcher and the event receiver.
    pub fn spawn(
        monitor: DeviceMonitor,
        interval: Duration,
    ) -> std::io::Result<(Self, Receiver<HotplugEvent>)> {
        let (sender, receiver) = bounded(64);
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("device-monitor".to_string())
            .spawn(move || Self::run(monitor, sender, thread_running, interval))?;

        Ok((
            Self {
                running,
                handle: Some(handle),
            },
            receiver,
        ))
    }

    fn run(
        mut monitor: DeviceMonitor,
        sender: Sender<HotplugEvent>,
        running: Arc<AtomicBool>,
        interval: Duration,
    ) -> DeviceMonitor {
        info!("Device monitor thread started");

        while running.load(Ordering::SeqCst) {
            for event in monitor.rescan() {
                match sender.try_send(event) {
                    Ok(()) => {}
                    Err(TrySendError::Full(event)) => {
                        warn!("Hotplug event channel full, dropping {:?}", event);
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        info!("Hotplug event channel disconnected");
                        running.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
            thread::sleep(interval);
        }

        info!("Device monitor thread exited");
        monitor
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops the rescan thread and hands the monitor back.
    pub fn stop(mut self) -> Option<DeviceMonitor> {
        self.running.store(false, Ordering::SeqCst);
        self.handle.take().and_then(|h| h.join().ok())
    }
}

impl Drop for MonitorWatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end registry tests driven through the test harness.

use std::sync::Arc;
use std::time::Duration;

use nodeplug_core::{Context, Device, NodePlugError};
use nodeplug_plugin::{PluginDescriptor, PluginMap};
use nodeplug_test_utils::{MockDevicePlugin, TestHarness};

fn names(map: &PluginMap) -> Vec<String> {
    map.keys().map(|k| k.to_string()).collect()
}

#[tokio::test]
async fn builtin_only_configuration() {
    let (registry, ctx) = TestHarness::new().with_builtins(&["gpu"]).build();
    registry.initialize(&ctx).await.unwrap();

    let map = registry.name_to_plugins();
    assert_eq!(names(&map), vec!["gpu"]);
    assert_eq!(map["gpu"].describe(), "GpuResourcePlugin");
    assert!(registry.mapping_manager().is_none());
}

#[tokio::test]
async fn vendor_plugin_is_adapted_next_to_builtins() {
    let vendor = MockDevicePlugin::new("fpga-vendor-x").with_devices(vec![
        Device::new(0, "/dev/xfpga0"),
        Device::new(1, "/dev/xfpga1"),
    ]);
    let (registry, ctx) = TestHarness::new()
        .with_builtins(&["gpu"])
        .with_resource_type("fpga-vendor-x")
        .with_device_plugin("com.vendor.x.FpgaPlugin", vendor)
        .build();
    registry.initialize(&ctx).await.unwrap();

    let map = registry.name_to_plugins();
    assert_eq!(names(&map), vec!["gpu", "fpga-vendor-x"]);
    assert!(map["fpga-vendor-x"].describe().contains("com.vendor.x.FpgaPlugin"));

    let manager = registry.mapping_manager().expect("framework enabled");
    let devices = manager.device_set("fpga-vendor-x").await.unwrap();
    assert_eq!(devices.len(), 2);
}

#[tokio::test]
async fn vendor_plugin_alone_without_builtins() {
    let (registry, ctx) = TestHarness::new()
        .with_resource_type("fpga-vendor-x")
        .with_device_plugin(
            "com.vendor.x.FpgaPlugin",
            MockDevicePlugin::new("fpga-vendor-x"),
        )
        .build();
    registry.initialize(&ctx).await.unwrap();

    let map = registry.name_to_plugins();
    assert_eq!(names(&map), vec!["fpga-vendor-x"]);
    let manager = registry.mapping_manager().expect("framework enabled");
    assert_eq!(
        manager.resource_names().await.iter().map(|n| n.as_str()).collect::<Vec<_>>(),
        vec!["fpga-vendor-x"]
    );
}

#[tokio::test]
async fn missing_operation_is_interface_mismatch() {
    let descriptor =
        PluginDescriptor::device_plugin("com.vendor.Broken").without_operation("devices");
    let (registry, ctx) = TestHarness::new()
        .with_resource_type("broken")
        .with_extension(descriptor, MockDevicePlugin::new("broken"))
        .build();

    let err = registry.initialize(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        NodePlugError::InterfaceMismatch { ref class_name, .. } if class_name == "com.vendor.Broken"
    ));
    assert!(registry.name_to_plugins().is_empty());
    assert!(registry.mapping_manager().is_none());
}

#[tokio::test]
async fn unknown_class_is_class_load_error() {
    let (registry, ctx) = TestHarness::new().with_class_name("com.vendor.Absent").build();
    let err = registry.initialize(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        NodePlugError::ClassLoadError { ref class_name, .. } if class_name == "com.vendor.Absent"
    ));
}

#[tokio::test]
async fn resource_name_outside_catalog_is_rejected() {
    let (registry, ctx) = TestHarness::new()
        .with_device_plugin("com.vendor.Rogue", MockDevicePlugin::new("rogue-accel"))
        .build();
    let err = registry.initialize(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        NodePlugError::UnconfiguredResourceType { ref name, .. } if name == "rogue-accel"
    ));
}

#[tokio::test]
async fn vendor_plugin_cannot_claim_builtin_name() {
    let (registry, ctx) = TestHarness::new()
        .with_builtins(&["gpu"])
        .with_resource_type("gpu")
        .with_device_plugin("com.vendor.Gpu", MockDevicePlugin::new("gpu"))
        .build();
    let err = registry.initialize(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        NodePlugError::DuplicateResourceType { ref name, ref class_name }
            if name == "gpu" && class_name == "com.vendor.Gpu"
    ));
    assert!(registry.name_to_plugins().is_empty());
}

#[tokio::test]
async fn cleanup_visits_each_plugin_once_in_order() {
    let harness = TestHarness::new()
        .with_builtins(&["fpga"])
        .with_resource_type("accel-b")
        .with_resource_type("accel-a")
        .with_device_plugin("com.vendor.B", MockDevicePlugin::new("accel-b"))
        .with_device_plugin("com.vendor.A", MockDevicePlugin::new("accel-a"));
    let journal = harness.journal();
    let (registry, ctx) = harness.build();

    registry.initialize(&ctx).await.unwrap();
    registry.cleanup().await.unwrap();

    assert_eq!(journal.entries().await, vec!["accel-b", "accel-a"]);
    let manager = registry.mapping_manager().unwrap();
    assert_eq!(manager.device_count().await, 0);
}

#[tokio::test]
async fn cleanup_stops_at_first_failure() {
    let harness = TestHarness::new()
        .with_resource_type("accel-a")
        .with_resource_type("accel-b")
        .with_device_plugin(
            "com.vendor.A",
            MockDevicePlugin::new("accel-a").failing_cleanup("device busy"),
        )
        .with_device_plugin("com.vendor.B", MockDevicePlugin::new("accel-b"));
    let journal = harness.journal();
    let (registry, ctx) = harness.build();
    registry.initialize(&ctx).await.unwrap();

    let err = registry.cleanup().await.unwrap_err();
    assert!(matches!(
        err,
        NodePlugError::PluginCleanupError { ref name, .. } if name == "accel-a"
    ));
    assert_eq!(journal.entries().await, vec!["accel-a"]);
}

#[tokio::test(start_paused = true)]
async fn stalled_self_description_times_out() {
    let (registry, ctx) = TestHarness::new()
        .with_resource_type("slow")
        .with_registration_timeout_secs(5)
        .with_device_plugin(
            "com.vendor.Slow",
            MockDevicePlugin::new("slow").stalling_registration(Duration::from_secs(600)),
        )
        .build();

    let err = registry.initialize(&ctx).await.unwrap_err();
    match err {
        NodePlugError::PluginRegistrationError { class_name, source, .. } => {
            assert_eq!(class_name, "com.vendor.Slow");
            assert!(source.is_none());
        }
        other => panic!("expected PluginRegistrationError, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_initialize_rolls_back_loaded_plugins() {
    let harness = TestHarness::new()
        .with_resource_type("accel-a")
        .with_resource_type("accel-b")
        .with_device_plugin("com.vendor.A", MockDevicePlugin::new("accel-a"))
        .with_device_plugin(
            "com.vendor.B",
            MockDevicePlugin::new("accel-b").failing_devices("driver not loaded"),
        );
    let journal = harness.journal();
    let (registry, ctx) = harness.build();

    let err = registry.initialize(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        NodePlugError::AdapterInitError { ref name, .. } if name == "accel-b"
    ));
    assert_eq!(journal.count("accel-a").await, 1);
    assert_eq!(journal.count("accel-b").await, 0);
    assert!(registry.name_to_plugins().is_empty());
}

#[tokio::test]
async fn failed_reinitialize_keeps_previous_mapping() {
    let (registry, ctx) = TestHarness::new()
        .with_builtins(&["gpu", "fpga"])
        .build();
    registry.initialize(&ctx).await.unwrap();
    let before = registry.name_to_plugins();

    let (_, bad_ctx) = TestHarness::new().with_builtins(&["gpu", "asic"]).build();
    let err = registry.initialize(&bad_ctx).await.unwrap_err();
    assert!(matches!(err, NodePlugError::UnsupportedResourceType { .. }));

    let after = registry.name_to_plugins();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(names(&after), vec!["gpu", "fpga"]);
}

#[tokio::test]
async fn failed_reinitialize_keeps_published_device_sets() {
    let harness = TestHarness::new()
        .with_resource_type("accel-x")
        .with_device_plugin("com.vendor.X", MockDevicePlugin::new("accel-x"))
        .with_device_plugin("com.vendor.Rogue", MockDevicePlugin::new("not-in-catalog"));
    let journal = harness.journal();
    let mut first = harness.config().clone();
    first.device_framework.device_classes = Some(vec!["com.vendor.X".to_string()]);
    let (registry, both_ctx) = harness.build();

    registry.initialize(&Context::new(first)).await.unwrap();
    let manager = registry.mapping_manager().unwrap();
    let published = manager.device_set("accel-x").await;
    assert_eq!(published, Some(vec![Device::new(0, "/dev/accel-x0")]));

    let err = registry.initialize(&both_ctx).await.unwrap_err();
    assert!(matches!(
        err,
        NodePlugError::UnconfiguredResourceType { ref name, .. } if name == "not-in-catalog"
    ));

    assert_eq!(names(&registry.name_to_plugins()), vec!["accel-x"]);
    assert_eq!(manager.device_set("accel-x").await, published);
    assert_eq!(manager.resource_names().await.len(), 1);
    // Only the instance built by the failed attempt was cleaned up.
    assert_eq!(journal.count("accel-x").await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_observe_partial_mapping() {
    let harness = TestHarness::new()
        .with_builtins(&["gpu"])
        .with_resource_type("accel-a")
        .with_resource_type("accel-b")
        .with_device_plugin("com.vendor.A", MockDevicePlugin::new("accel-a"))
        .with_device_plugin("com.vendor.B", MockDevicePlugin::new("accel-b"));
    let (registry, ctx) = harness.build();
    let registry = Arc::new(registry);

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                for _ in 0..200 {
                    let len = registry.name_to_plugins().len();
                    assert!(len == 0 || len == 3, "observed partial mapping of {len}");
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for _ in 0..5 {
        registry.initialize(&ctx).await.unwrap();
    }
    for reader in readers {
        reader.await.unwrap();
    }
    assert_eq!(registry.name_to_plugins().len(), 3);
}

#[tokio::test]
async fn disabled_framework_ignores_class_list() {
    let (registry, ctx) = TestHarness::new()
        .with_builtins(&["fpga"])
        .with_class_name("com.vendor.NeverLoaded")
        .configure(|conf| conf.device_framework.enabled = false)
        .build();
    registry.initialize(&ctx).await.unwrap();
    assert_eq!(names(&registry.name_to_plugins()), vec!["fpga"]);
    assert!(registry.mapping_manager().is_none());
}

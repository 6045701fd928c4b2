/*
 * Images deployed when the caller does not pin its own.
 */

pub const SCHEDULER_PLUGIN_IMAGE: &str = "k8s.gcr.io/scheduler-plugins/kube-scheduler:v0.19.9";

pub const RESOURCE_TOPOLOGY_EXPORTER_IMAGE: &str = "quay.io/k8stopologyawareschedwg/resource-topology-exporter:v0.2.0";

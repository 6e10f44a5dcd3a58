//! Bitstream encoding for the MX device family.
//!
//! Serializes a frozen placement plus run-level metadata into the part's
//! fixed-length, checksum-protected configuration image, and decodes such
//! images back into per-resource configuration for verification. Both the
//! in-memory buffer and the file output share the same field-encoding walk.
//!
//! For every legal assignment `A`, `decode(encode(A))` reproduces the
//! encoder's per-resource configuration exactly.

#![warn(missing_docs)]

pub mod crc;
pub mod decode;
pub mod encode;
pub mod error;
pub mod fields;
pub mod image;
pub mod layout;

pub use crc::crc16;
pub use decode::{decode, DecodedImage, MetaConfig};
pub use encode::encode;
pub use error::EncodingError;
pub use fields::ResourceConfig;
pub use image::BitstreamImage;
pub use layout::{FieldWindow, ImageLayout, META_BITS, TAP_BITS, TAP_NONE};

#[cfg(test)]
mod tests {
    use super::*;
    use silk_config::{DeviceConfig, RunConfig};
    use silk_device::{DeviceGraph, PartId, PullDirection, ResourceKind};
    use silk_diagnostics::DiagnosticSink;
    use silk_netlist::parse_netlist;
    use silk_place::{convert, place, AnnealSchedule, Binding};
    use silk_timing::TimingModel;
    use std::collections::BTreeMap;

    const AND_NETLIST: &str = r#"{
        "modules": {
            "top": {
                "attributes": { "UNUSED_PULL": "UP" },
                "ports": {
                    "a": { "direction": "input", "bits": [2] },
                    "b": { "direction": "input", "bits": [3] },
                    "y": { "direction": "output", "bits": [4] }
                },
                "cells": {
                    "and1": {
                        "type": "LUT2",
                        "parameters": { "INIT": "1000" },
                        "connections": { "IN0": [2], "IN1": [3], "OUT": [4] }
                    }
                },
                "netnames": {
                    "a": { "bits": [2] },
                    "b": { "bits": [3] },
                    "y": { "bits": [4] }
                }
            }
        }
    }"#;

    fn merged_config(run: &RunConfig, netlist_text: &str) -> DeviceConfig {
        let parsed = parse_netlist(netlist_text).unwrap();
        let sink = DiagnosticSink::new();
        silk_config::merge(run, &parsed.top_module().attributes, &sink).unwrap()
    }

    fn place_and(seed: u64, bindings: &[Binding]) -> (silk_place::PlaceNetlist, silk_place::Assignment, DeviceGraph) {
        let parsed = parse_netlist(AND_NETLIST).unwrap();
        let netlist = convert(parsed.top_module()).unwrap();
        let graph = DeviceGraph::new(PartId::Mx3620);
        let timing = TimingModel::empty();
        let sink = DiagnosticSink::new();
        let assignment = place(
            &netlist,
            &graph,
            bindings,
            &timing,
            &AnnealSchedule::default(),
            seed,
            &sink,
        )
        .unwrap();
        (netlist, assignment, graph)
    }

    #[test]
    fn encode_decode_roundtrip() {
        let run = RunConfig::for_part(PartId::Mx3620);
        let config = merged_config(&run, AND_NETLIST);
        let (netlist, assignment, graph) = place_and(5, &[]);

        let image = encode(&netlist, &assignment, &graph, &config).unwrap();
        assert_eq!(image.len_bits(), 2048);

        let decoded = decode(&image, &graph).unwrap();
        assert!(decoded.crc_ok);

        // Decoding reproduces exactly what the encoder computed per resource.
        let expected =
            encode::build_resource_configs(&netlist, &assignment, &graph, &config).unwrap();
        assert_eq!(decoded.configs, expected);
    }

    #[test]
    fn and_truth_table_lands_in_the_lut_field() {
        let run = RunConfig::for_part(PartId::Mx3620);
        let config = merged_config(&run, AND_NETLIST);

        // Pin the AND onto a known instance so the field location is fixed.
        let parsed = parse_netlist(AND_NETLIST).unwrap();
        let netlist = convert(parsed.top_module()).unwrap();
        let graph = DeviceGraph::new(PartId::Mx3620);
        let lut2_0 = graph.find_instance(ResourceKind::Lut2, 0).unwrap();
        let bindings = [Binding {
            cell: netlist.cell_by_name["and1"],
            resource: lut2_0,
            locked: true,
        }];
        let (netlist, assignment, graph) = {
            let sink = DiagnosticSink::new();
            let assignment = place(
                &netlist,
                &graph,
                &bindings,
                &TimingModel::empty(),
                &AnnealSchedule::default(),
                2,
                &sink,
            )
            .unwrap();
            (netlist, assignment, graph)
        };

        let image = encode(&netlist, &assignment, &graph, &config).unwrap();
        let decoded = decode(&image, &graph).unwrap();
        match decoded.configs[lut2_0.index()] {
            ResourceConfig::Lut { init, taps } => {
                // 1 only when both inputs are 1.
                assert_eq!(init, 0b1000);
                let a_site = assignment.site_of(netlist.cell_by_name["a"]).unwrap();
                let b_site = assignment.site_of(netlist.cell_by_name["b"]).unwrap();
                assert_eq!(taps[0], a_site.as_raw() as u8);
                assert_eq!(taps[1], b_site.as_raw() as u8);
            }
            ref other => panic!("expected a LUT config, got {other:?}"),
        }
    }

    #[test]
    fn unused_pull_attribute_reaches_every_unconnected_iob() {
        // UNUSED_PULL=UP on the top module, no caller override.
        let run = RunConfig::for_part(PartId::Mx3620);
        let config = merged_config(&run, AND_NETLIST);
        assert_eq!(config.unused_pull, PullDirection::Up);

        let (netlist, assignment, graph) = place_and(8, &[]);
        let image = encode(&netlist, &assignment, &graph, &config).unwrap();
        let decoded = decode(&image, &graph).unwrap();

        for &id in graph.resources_of_kind(ResourceKind::Iob) {
            if assignment.cell_at(id).is_some() {
                continue;
            }
            match decoded.configs[id.index()] {
                ResourceConfig::Iob { pull, .. } => {
                    assert_eq!(pull, PullDirection::Up, "IOB pin {:?}", graph.resource(id).pin)
                }
                ref other => panic!("expected an IOB config, got {other:?}"),
            }
        }
    }

    #[test]
    fn identical_runs_yield_byte_identical_images() {
        let run = RunConfig::for_part(PartId::Mx3620);
        let config = merged_config(&run, AND_NETLIST);

        let (nl1, asg1, graph1) = place_and(21, &[]);
        let (nl2, asg2, _) = place_and(21, &[]);

        let image1 = encode(&nl1, &asg1, &graph1, &config).unwrap();
        let image2 = encode(&nl2, &asg2, &graph1, &config).unwrap();
        assert_eq!(image1.as_bytes(), image2.as_bytes());
    }

    #[test]
    fn caller_override_beats_the_attribute() {
        let mut run = RunConfig::for_part(PartId::Mx3620);
        run.unused_pull = Some(PullDirection::Down);
        let parsed = parse_netlist(AND_NETLIST).unwrap();
        let sink = DiagnosticSink::new();
        let config = silk_config::merge(&run, &parsed.top_module().attributes, &sink).unwrap();
        assert_eq!(config.unused_pull, PullDirection::Down);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn metadata_roundtrip_through_decode() {
        let mut run = RunConfig::for_part(PartId::Mx3620);
        run.user_code = 0x5A;
        run.read_protect = true;
        run.io_precharge = true;
        run.charge_pump_disable = true;
        run.ldo_bypass = true;
        run.boot_retry = 2;
        run.analog_bias = 7;
        let sink = DiagnosticSink::new();
        let config = silk_config::merge(&run, &BTreeMap::new(), &sink).unwrap();

        let (netlist, assignment, graph) = place_and(1, &[]);
        let image = encode(&netlist, &assignment, &graph, &config).unwrap();
        let decoded = decode(&image, &graph).unwrap();

        assert_eq!(
            decoded.meta,
            MetaConfig {
                user_code: 0x5A,
                read_protect: true,
                charge_pump_disable: true,
                ldo_bypass: true,
                io_precharge: true,
                boot_retry: 2,
                analog_bias: 7,
            }
        );
    }
}

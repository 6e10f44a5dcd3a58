//! The silk fitter pipeline.
//!
//! Compiles a synthesized gate-level netlist onto one MX-family part:
//! parse → merge configuration → build the device graph → resolve
//! constraints → place → final legality pass → encode. Failure at any
//! stage aborts with a typed [`CompileError`] and no output file; a
//! partially written image is removed.
//!
//! The surrounding tools (command-line front end, device programmer,
//! timing characterization harness) consume this crate's inputs and
//! outputs as plain data and are not part of the pipeline.

#![warn(missing_docs)]

pub mod error;
pub mod report;

pub use error::CompileError;

use silk_bitstream::{encode, BitstreamImage};
use silk_config::{DeviceConfig, RunConfig};
use silk_constraint::{parse_constraints, resolve};
use silk_device::DeviceGraph;
use silk_diagnostics::DiagnosticSink;
use silk_netlist::parse_netlist;
use silk_place::{convert, place, AnnealSchedule, Assignment, PlaceNetlist};
use silk_timing::TimingModel;
use std::path::Path;

/// Everything a fitter run produces.
#[derive(Debug)]
pub struct CompileOutput {
    /// The finalized configuration image.
    pub image: BitstreamImage,
    /// The flat placement netlist.
    pub netlist: PlaceNetlist,
    /// The frozen assignment.
    pub assignment: Assignment,
    /// The device graph the design was fitted onto.
    pub graph: DeviceGraph,
    /// The effective device configuration after attribute merging.
    pub config: DeviceConfig,
    /// The loaded timing model (empty when no data was available).
    pub timing: TimingModel,
}

/// Runs the whole pipeline on in-memory inputs.
///
/// `constraint_text` is the content of the constraint file, if one was
/// given. Warnings and notices land in `sink`; all fatal conditions are
/// typed errors.
pub fn compile(
    netlist_json: &str,
    constraint_text: Option<&str>,
    run: &RunConfig,
    schedule: &AnnealSchedule,
    sink: &DiagnosticSink,
) -> Result<CompileOutput, CompileError> {
    let parsed = parse_netlist(netlist_json)?;
    let config = silk_config::merge(run, &parsed.top_module().attributes, sink)?;
    let graph = DeviceGraph::new(config.part);

    let netlist = convert(parsed.top_module())?;
    let bindings = match constraint_text {
        Some(text) => resolve(&parse_constraints(text)?, &netlist, &graph)?,
        None => Vec::new(),
    };

    let timing = load_timing(run, sink)?;
    let assignment = place(
        &netlist,
        &graph,
        &bindings,
        &timing,
        schedule,
        config.seed,
        sink,
    )?;

    let image = encode(&netlist, &assignment, &graph, &config)?;

    Ok(CompileOutput {
        image,
        netlist,
        assignment,
        graph,
        config,
        timing,
    })
}

/// Writes the finalized image to a file.
///
/// Shares the encoder's buffer; on failure any partial file is removed.
pub fn write_bitstream(output: &CompileOutput, path: &Path) -> Result<(), CompileError> {
    output.image.write_to_file(path)?;
    Ok(())
}

/// Loads the timing model named by the run configuration.
///
/// A missing file degrades to non-timing-driven placement with a warning;
/// malformed data is fatal.
fn load_timing(run: &RunConfig, sink: &DiagnosticSink) -> Result<TimingModel, CompileError> {
    let Some(path) = &run.timing_path else {
        return Ok(TimingModel::empty());
    };
    match TimingModel::load(path) {
        Ok(model) => Ok(model),
        Err(e) if e.is_not_found() => {
            sink.warning(
                "timing data file not found; unable to do timing-driven placement \
                 or evaluate post-fit timing",
            );
            Ok(TimingModel::empty())
        }
        Err(e) => Err(e.into()),
    }
}

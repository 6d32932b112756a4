use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use fedprep_device::Owner;
use fedprep_frame::{
    FedDataFrame, HDataFrame, MixPartitions, Partition, ScalingParams, VDataFrame,
};
use fedprep_preprocessing::{
    FittedParams, MinMaxScaler, MinMaxScalerOptions, StandardScaler, StandardScalerOptions,
};
use fedprep_security::{PlainAggregator, PlainComparator};
use indexmap::IndexMap;
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use serde::de::DeserializeOwned;
use tracing::{info, info_span};

use crate::cli::{FitArgs, FrameArgs, LayoutArg, PartArg, ScalerArg};
use crate::types::{Description, FitResult, ParamRow};

pub fn run_describe(args: &FrameArgs) -> Result<Description> {
    let frame = build_frame(args)?;
    let _guard = info_span!("describe", kind = frame.kind_name()).entered();
    Ok(Description {
        kind: frame.kind_name(),
        shape: frame.shape(),
        count: frame.count().context("count")?,
        mean: frame.mean().context("mean")?,
        std: frame.std().context("std")?,
        min: frame.min().context("min")?,
        max: frame.max().context("max")?,
    })
}

pub fn run_fit(args: &FitArgs) -> Result<FitResult> {
    let frame = build_frame(&args.frame)?;
    let mut scaler = build_scaler(args)?;
    let _guard = info_span!("fit", scaler = scaler.name(), kind = frame.kind_name()).entered();

    let transformed = scaler
        .fit_transform(&frame)
        .with_context(|| format!("fit {}", scaler.name()))?;
    let mut params = Vec::new();
    if let Some(fitted) = scaler.params() {
        param_rows(fitted, "global", &mut params);
    }

    let outputs = match &args.output_dir {
        Some(dir) => write_fragments(&transformed, dir)?,
        None => Vec::new(),
    };
    Ok(FitResult {
        scaler: scaler.name(),
        kind: transformed.kind_name(),
        shape: transformed.shape(),
        params,
        outputs,
    })
}

/// Load every fragment on its owner and assemble the partitioned frame.
pub fn build_frame(args: &FrameArgs) -> Result<FedDataFrame> {
    let partitions = args
        .parts
        .iter()
        .map(load_part)
        .collect::<Result<Vec<_>>>()?;
    let frame: FedDataFrame = match args.layout {
        LayoutArg::Horizontal => HDataFrame::new(
            partitions,
            Arc::new(PlainAggregator::new(Owner::new(args.aggregator.as_str()))),
            Arc::new(PlainComparator::new(Owner::new(args.comparator.as_str()))),
        )
        .context("build row-partitioned frame")?
        .into(),
        LayoutArg::Vertical => VDataFrame::new(partitions)
            .context("build column-partitioned frame")?
            .into(),
    };
    match &args.columns {
        Some(columns) => frame.select(columns.as_slice()).context("select columns"),
        None => Ok(frame),
    }
}

fn load_part(part: &PartArg) -> Result<Partition> {
    let owner = Owner::new(part.owner.as_str());
    let data = owner
        .try_run(|| read_csv(&part.path))
        .with_context(|| format!("load fragment of {owner}"))?;
    info!(owner = %owner, path = %part.path.display(), "loaded fragment");
    Ok(Partition::new(data))
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open {}", path.display()))?
        .finish()
        .with_context(|| format!("parse {}", path.display()))
}

/// Scaler selected on the command line.
enum Scaler {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl Scaler {
    fn name(&self) -> &'static str {
        match self {
            Self::Standard(_) => "StandardScaler",
            Self::MinMax(_) => "MinMaxScaler",
        }
    }

    fn fit_transform(
        &mut self,
        frame: &FedDataFrame,
    ) -> fedprep_preprocessing::Result<FedDataFrame> {
        match self {
            Self::Standard(scaler) => scaler.fit_transform(frame, None, None),
            Self::MinMax(scaler) => scaler.fit_transform(frame, None, None),
        }
    }

    fn params(&self) -> Option<&FittedParams> {
        match self {
            Self::Standard(scaler) => scaler.params(),
            Self::MinMax(scaler) => scaler.params(),
        }
    }
}

fn build_scaler(args: &FitArgs) -> Result<Scaler> {
    let options_path = args.options.as_deref();
    match args.scaler {
        ScalerArg::Standard => {
            let mut options: StandardScalerOptions = read_options(options_path)?;
            if args.no_mean {
                options = options.with_mean(false);
            }
            if args.no_std {
                options = options.with_std(false);
            }
            Ok(Scaler::Standard(StandardScaler::new(options)))
        }
        ScalerArg::Minmax => {
            let mut options: MinMaxScalerOptions = read_options(options_path)?;
            if let Some((lo, hi)) = args.feature_range {
                options = options.with_feature_range(lo, hi);
            }
            Ok(Scaler::MinMax(MinMaxScaler::new(options)?))
        }
    }
}

fn read_options<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse options {}", path.display()))
}

/// Reveal fitted parameters for display.
fn param_rows(params: &FittedParams, scope: &str, rows: &mut Vec<ParamRow>) {
    match params {
        FittedParams::Global(params) => push_rows(params, scope, rows),
        FittedParams::PerOwner(by_owner) => {
            for (owner, params) in by_owner {
                push_rows(&params.reveal(), owner.party(), rows);
            }
        }
        FittedParams::PerElement(elements) => {
            for (idx, element) in elements.iter().enumerate() {
                param_rows(element, &format!("element {idx}"), rows);
            }
        }
    }
}

fn push_rows(params: &ScalingParams, scope: &str, rows: &mut Vec<ParamRow>) {
    for (idx, column) in params.columns.iter().enumerate() {
        rows.push(ParamRow {
            scope: scope.to_string(),
            column: column.clone(),
            shift: params.shift[idx],
            scale: params.scale[idx],
            offset: params.offset[idx],
        });
    }
}

/// Write each owner's fragment into `dir` from inside that owner.
fn write_fragments(frame: &FedDataFrame, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut outputs = Vec::new();
    for (name, partition) in fragments(frame) {
        let path = dir.join(format!("{name}.csv"));
        partition
            .data()
            .try_apply(|df| write_csv(df, &path))
            .with_context(|| format!("write fragment of {}", partition.owner()))?;
        info!(owner = %partition.owner(), path = %path.display(), "wrote fragment");
        outputs.push(path);
    }
    Ok(outputs)
}

fn fragments(frame: &FedDataFrame) -> Vec<(String, &Partition)> {
    match frame {
        FedDataFrame::Horizontal(h) => named(h.partitions(), None),
        FedDataFrame::Vertical(v) => named(v.partitions(), None),
        FedDataFrame::Mixed(mix) => match mix.partitions() {
            MixPartitions::VFrames(frames) => frames
                .iter()
                .enumerate()
                .flat_map(|(idx, v)| named(v.partitions(), Some(idx)))
                .collect(),
            MixPartitions::HFrames(frames) => frames
                .iter()
                .enumerate()
                .flat_map(|(idx, h)| named(h.partitions(), Some(idx)))
                .collect(),
        },
    }
}

fn named(
    partitions: &IndexMap<Owner, Partition>,
    element: Option<usize>,
) -> Vec<(String, &Partition)> {
    partitions
        .iter()
        .map(|(owner, partition)| match element {
            Some(idx) => (format!("{}-{idx}", owner.party()), partition),
            None => (owner.party().to_string(), partition),
        })
        .collect()
}

fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df.clone())
        .with_context(|| format!("write {}", path.display()))
}

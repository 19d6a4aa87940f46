use std::path::PathBuf;

use crate::encode::{FfmpegSink, FfmpegSinkOpts, FrameSink, encode_sequence, load_sequence};
use crate::expression::{Expression, MapEnv, Template, Value};
use crate::foundation::core::Fps;
use crate::foundation::error::{PostproError, PostproResult};
use crate::plugin::{Action, ActionEntry, PlaneContext, RunEnv};
use crate::schema::{OptionDef, OptionDefault as D, Options};

const DEFS: &[OptionDef] = &[
    OptionDef::required("name", D::Str("output.mp4"), "Name of the output file"),
    OptionDef::optional("fps", D::Int(1), "Frame rate"),
    OptionDef::required(
        "imagefilename",
        D::Str(""),
        "Template of the frame images, with {time}, {iplane} and {iter}",
    ),
    OptionDef::optional("times", D::Null, "Times to use instead of the plane iterations"),
];

pub(super) const ANIMATE: ActionEntry = ActionEntry {
    name: "animate",
    blurb: "Assemble the saved images into an mp4 movie",
    required: false,
    defs: DEFS,
    build: build_animate,
};

pub(super) const MAKEGIF: ActionEntry = ActionEntry {
    name: "makegif",
    blurb: "Assemble the saved images into an animated gif",
    required: false,
    defs: DEFS,
    build: build_makegif,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Container {
    Mp4,
    Gif,
}

impl Container {
    fn action_name(self) -> &'static str {
        match self {
            Self::Mp4 => "animate",
            Self::Gif => "makegif",
        }
    }
}

/// Shared by `animate` and `makegif`: collects frame images and encodes them.
#[derive(Debug)]
pub(crate) struct AnimateAction {
    container: Container,
    out_path: PathBuf,
    fps: Fps,
    imagefilename: Template,
    times: Option<TimesOverride>,
}

/// `makegif` frame times given either as numbers or as an expression.
#[derive(Clone, Debug, PartialEq)]
enum TimesOverride {
    List(Vec<f64>),
    Expr(String),
}

impl TimesOverride {
    fn from_options(opts: &Options) -> Option<Self> {
        let parsed = match opts.raw("times") {
            None | Some(serde_json::Value::Null) => return None,
            Some(serde_json::Value::Array(_)) => opts.f64_list("times").map(Self::List),
            Some(_) => opts.expr("times").map(Self::Expr),
        };
        match parsed {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!("{e}, using the plane iterations");
                None
            }
        }
    }

    fn eval(&self) -> PostproResult<Vec<f64>> {
        match self {
            Self::List(v) => Ok(v.clone()),
            Self::Expr(src) => Expression::compile(src)?.eval_f64_list(&MapEnv::new()),
        }
    }
}

fn build_animate(opts: &Options) -> PostproResult<Box<dyn Action>> {
    Ok(Box::new(AnimateAction::new(opts, Container::Mp4)?))
}

fn build_makegif(opts: &Options) -> PostproResult<Box<dyn Action>> {
    Ok(Box::new(AnimateAction::new(opts, Container::Gif)?))
}

impl AnimateAction {
    fn new(opts: &Options, container: Container) -> PostproResult<Self> {
        let name = opts.str("name")?;
        if name.is_empty() {
            return Err(PostproError::validation(format!(
                "{}.name: output path is empty",
                opts.owner()
            )));
        }
        let imagefilename = opts.str("imagefilename")?;
        if imagefilename.is_empty() {
            return Err(PostproError::validation(format!(
                "{}.imagefilename: frame template is empty",
                opts.owner()
            )));
        }
        let times = TimesOverride::from_options(opts);
        if times.is_some() && container == Container::Mp4 {
            tracing::warn!(
                "{}: times is not used by animate, all iterations are encoded",
                opts.owner()
            );
        }
        Ok(Self {
            container,
            out_path: PathBuf::from(name),
            fps: Fps::from_f64(opts.f64("fps")?)?,
            imagefilename: Template::parse(imagefilename)?,
            times: if container == Container::Gif { times } else { None },
        })
    }

    /// Frame paths for the plane's resolved iterations.
    fn iteration_paths(&self, ctx: &PlaneContext<'_>) -> PostproResult<Vec<PathBuf>> {
        (0..ctx.iters().len())
            .map(|k| Ok(PathBuf::from(self.imagefilename.render(&ctx.slice_env(k))?)))
            .collect()
    }

    /// Frame paths for an explicit list of times; `iter` is the position in the list.
    fn time_paths(&self, times: &TimesOverride, iplane: usize) -> PostproResult<Vec<PathBuf>> {
        times
            .eval()?
            .iter()
            .enumerate()
            .map(|(k, t)| {
                let env = MapEnv::new()
                    .with("time", Value::Float(*t))
                    .with("iplane", Value::Int(iplane as i64))
                    .with("iter", Value::Int(k as i64));
                Ok(PathBuf::from(self.imagefilename.render(&env)?))
            })
            .collect()
    }

    /// Frame paths in encode order, honouring a `times` override when it evaluates.
    pub(crate) fn frame_paths(&self, ctx: &PlaneContext<'_>) -> PostproResult<Vec<PathBuf>> {
        if let Some(times) = &self.times {
            match self.time_paths(times, ctx.iplane()) {
                Ok(paths) if !paths.is_empty() => return Ok(paths),
                Ok(_) => tracing::warn!("times override is empty, using the plane iterations"),
                Err(e) => tracing::warn!("times override failed ({e}), using the plane iterations"),
            }
        }
        self.iteration_paths(ctx)
    }

    /// Encoder for the container, `None` when it is not compiled in.
    fn open_sink(&self) -> Option<Box<dyn FrameSink>> {
        match self.container {
            Container::Mp4 => Some(Box::new(FfmpegSink::new(FfmpegSinkOpts::new(
                self.out_path.clone(),
            )))),
            #[cfg(feature = "gif")]
            Container::Gif => Some(Box::new(crate::encode::GifSink::new(self.out_path.clone()))),
            #[cfg(not(feature = "gif"))]
            Container::Gif => None,
        }
    }
}

impl Action for AnimateAction {
    fn name(&self) -> &'static str {
        self.container.action_name()
    }

    #[tracing::instrument(
        skip(self, ctx, _env),
        fields(plane = ctx.name(), out = %self.out_path.display())
    )]
    fn execute(&self, ctx: &PlaneContext<'_>, _env: &mut RunEnv) -> PostproResult<()> {
        let Some(mut sink) = self.open_sink() else {
            tracing::warn!(
                "animated gif support is not compiled in (enable the `gif` feature), skipping {}",
                self.out_path.display()
            );
            return Ok(());
        };
        let paths = self.frame_paths(ctx)?;
        let seq = load_sequence(&paths)?;
        encode_sequence(sink.as_mut(), &seq, self.fps)?;
        tracing::info!(frames = seq.len(), "Wrote {}", self.out_path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/planes/animate.rs"]
mod tests;

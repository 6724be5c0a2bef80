use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
};

use crate::error::{FlashKitError, Result};

use super::resolver::RenderData;

const PAGE: &str = "page";
const LAYOUT: &str = "layout";

/// 渲染器选项
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// 布局模板，页面内容通过 `{{yield}}` 插入
    pub html_layout: Option<PathBuf>,
    /// 相对路径模板的根目录
    pub template_dir: Option<PathBuf>,
}

/// HTML 渲染器
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// 基于模板文件的视图，读取推迟到真正渲染时
    pub fn html(&self, path: impl AsRef<Path>) -> View {
        View {
            source: ViewSource::File(self.resolve_path(path.as_ref())),
            layout: self.layout_path(),
        }
    }

    /// 基于内联模板源码的视图
    pub fn html_str(&self, source: impl Into<String>) -> View {
        View {
            source: ViewSource::Inline(source.into()),
            layout: self.layout_path(),
        }
    }

    fn layout_path(&self) -> Option<PathBuf> {
        self.options
            .html_layout
            .as_deref()
            .map(|layout| self.resolve_path(layout))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.options.template_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[derive(Clone, Debug)]
enum ViewSource {
    File(PathBuf),
    Inline(String),
}

impl ViewSource {
    fn label(&self) -> String {
        match self {
            ViewSource::File(path) => path.display().to_string(),
            ViewSource::Inline(_) => "inline".to_string(),
        }
    }
}

/// 待渲染的页面
///
/// 每次渲染都重新从磁盘读取模板，修改模板文件后无需重启。
#[derive(Clone, Debug)]
pub struct View {
    source: ViewSource,
    layout: Option<PathBuf>,
}

impl View {
    /// 不使用布局
    pub fn without_layout(mut self) -> Self {
        self.layout = None;
        self
    }

    /// 以渲染数据树为上下文渲染页面，有布局时再把结果嵌入布局的 `{{yield}}`
    pub fn render(&self, data: &RenderData) -> Result<String> {
        let mut registry = Handlebars::new();
        let page = match &self.source {
            ViewSource::File(path) => load_template(path)?,
            ViewSource::Inline(source) => source.clone(),
        };
        let page_name = self.source.label();
        registry
            .register_template_string(PAGE, page)
            .map_err(|err| FlashKitError::Template(format!("{page_name}: {err}")))?;

        let content = registry
            .render(PAGE, data.as_value())
            .map_err(|err| render_failed(&page_name, err))?;

        let Some(layout_path) = &self.layout else {
            return Ok(content);
        };
        let layout_name = layout_path.display().to_string();
        registry
            .register_template_string(LAYOUT, load_template(layout_path)?)
            .map_err(|err| FlashKitError::Template(format!("{layout_name}: {err}")))?;
        registry.register_helper("yield", Box::new(YieldHelper { content }));

        tracing::trace!(page = %page_name, layout = %layout_name, "rendering with layout");
        registry
            .render(LAYOUT, data.as_value())
            .map_err(|err| render_failed(&layout_name, err))
    }
}

/// 布局里的 `{{yield}}`：原样输出已渲染的页面（页面内容已经转义过）
struct YieldHelper {
    content: String,
}

impl HelperDef for YieldHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        _: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        out.write(&self.content)?;
        Ok(())
    }
}

fn render_failed(name: &str, err: RenderError) -> FlashKitError {
    FlashKitError::Template(format!("{name}: {err}"))
}

fn load_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => FlashKitError::TemplateNotFound(path.display().to_string()),
        _ => FlashKitError::Template(format!("{}: {err}", path.display())),
    })
}

//! Content-stream operator interpreter.
//!
//! Drives the object parser in a loop, accumulating operands until an
//! operator token arrives, then dispatches on the operator's category.
//! Tracks the graphics-state stack (`q`/`Q`) and marked-content nesting
//! (`BDC`/`BMC`/`EMC`), and applies the output discipline that makes
//! single-pass rewriting possible: a region's removability is decided at
//! `BDC` time, before its content is seen.

use crate::document::{ImageProbe, ObjectResolver, PageResources};
use crate::error::{Result, StreamError};
use crate::interp::marked::{
    ContainerKind, MarkedContentInfo, RemovablePageContainer, RemovalFilter,
};
use crate::model::objects::{Dict, InlineImage, PdfObject};
use crate::model::state::GraphicsState;
use crate::parser::inline::parse_inline_image;
use crate::parser::lexer::Operator;
use crate::parser::objects::ObjectParser;
use crate::rewrite::serialize::{write_inline_image, write_object, write_operator_line};
use crate::utils::mult_matrix;
use rustc_hash::FxHashSet;

/// Handler category for an operator mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// Path construction and painting: m l c v y h re S s f F f* B B* b b* n W W*
    Path,
    /// Graphics state: q Q w J j M d ri i gs cm
    GraphicsState,
    /// Color: g G rg RG k K cs CS sc SC scn SCN sh
    Color,
    /// Text object and state: BT ET Tc Tw Tz TL Tf Tr Ts
    TextState,
    /// Text positioning: Td TD Tm T*
    TextPosition,
    /// Text showing: Tj ' " TJ
    TextShow,
    /// XObject invocation: Do
    XObject,
    /// Marked content: BMC BDC EMC
    MarkedContent,
    /// Inline image brackets: BI ID EI
    InlineImage,
    /// Everything else passes through unmodified
    Unknown,
}

/// Map an operator to its handler category.
pub fn op_class(op: &Operator) -> OpClass {
    use Operator::*;
    match op {
        Mm | L | C | V | Y | H | Re | S | Ss | F | Ff | FStar | B | BStar | Bb | BbStar | N
        | WClip | WStar => OpClass::Path,
        Qq | Q | Ww | J | Jj | M | D | Ri | I | Gs | Cm => OpClass::GraphicsState,
        G | Gg | RG | Rg | K | Kk | CS | Cs | SC | SCN | Sc | Scn | Sh => OpClass::Color,
        BT | ET | Tc | Tw | Tz | TL | Tf | Tr | Ts => OpClass::TextState,
        Td | TD | Tm | TStar => OpClass::TextPosition,
        Tj | TJ | Quote | DoubleQuote => OpClass::TextShow,
        Do => OpClass::XObject,
        BMC | BDC | EMC => OpClass::MarkedContent,
        BI | ID | EI => OpClass::InlineImage,
        _ => OpClass::Unknown,
    }
}

/// Result of interpreting one content stream.
#[derive(Debug, Clone)]
pub struct StreamOutcome {
    /// Re-serialized stream with suppressed operators removed
    pub output: Vec<u8>,
    /// Sealed regions in closing order, keyed by their page-order index
    pub containers: Vec<(usize, RemovablePageContainer)>,
}

/// Interpreter for a single content stream.
///
/// Created fresh per stream: the marked-content counters and the output
/// buffer are stream-scoped, and an error discards the whole buffer.
pub struct ContentInterpreter<'a> {
    resources: &'a PageResources,
    resolver: &'a dyn ObjectResolver,
    probe: &'a dyn ImageProbe,
    /// Removal filter; `None` runs the read-only discovery behavior
    filter: Option<&'a RemovalFilter>,
    /// XObject names dropped regardless of marked-content state
    xobjects_to_remove: FxHashSet<String>,
    gstate: GraphicsState,
    gstack: Vec<GraphicsState>,
    /// Nesting depth of regions currently suppressed (0 = emitting)
    mc_balance: usize,
    /// Sequential region cursor, incremented only on EMC
    container_index: usize,
    /// Regions currently open, innermost last
    open_regions: Vec<RemovablePageContainer>,
    /// Sealed regions in closing order
    containers: Vec<(usize, RemovablePageContainer)>,
    out: Vec<u8>,
}

impl<'a> ContentInterpreter<'a> {
    /// Read-only discovery interpreter: no region is ever suppressed.
    pub fn new(
        resources: &'a PageResources,
        resolver: &'a dyn ObjectResolver,
        probe: &'a dyn ImageProbe,
    ) -> Self {
        Self {
            resources,
            resolver,
            probe,
            filter: None,
            xobjects_to_remove: FxHashSet::default(),
            gstate: GraphicsState::new(),
            gstack: Vec::new(),
            mc_balance: 0,
            container_index: 0,
            open_regions: Vec::new(),
            containers: Vec::new(),
            out: Vec::new(),
        }
    }

    /// Removal interpreter: regions matching `filter` and XObjects in
    /// `xobjects_to_remove` are dropped from the output.
    pub fn with_filter(
        resources: &'a PageResources,
        resolver: &'a dyn ObjectResolver,
        probe: &'a dyn ImageProbe,
        filter: &'a RemovalFilter,
        xobjects_to_remove: FxHashSet<String>,
    ) -> Self {
        let mut interp = Self::new(resources, resolver, probe);
        interp.filter = Some(filter);
        interp.xobjects_to_remove = xobjects_to_remove;
        interp
    }

    /// Interpret one content stream to completion.
    pub fn process(mut self, data: &[u8]) -> Result<StreamOutcome> {
        let mut parser = ObjectParser::new(data);
        let mut operands: Vec<PdfObject> = Vec::new();

        while let Some(obj) = parser.read_object()? {
            match obj {
                PdfObject::Op(Operator::BI) => {
                    let image =
                        parse_inline_image(&mut parser, self.resources, self.resolver, self.probe)?;
                    self.handle_inline_image(&image);
                    operands.clear();
                }
                PdfObject::Op(op) => {
                    self.dispatch(&op, &operands)?;
                    operands.clear();
                }
                operand => operands.push(operand),
            }
        }

        // Trailing operands with no operator survive as-is
        if !operands.is_empty() && self.mc_balance == 0 {
            for operand in &operands {
                write_object(operand, &mut self.out);
                self.out.push(b' ');
            }
            self.out.push(b'\n');
        }

        if self.mc_balance != 0 || !self.open_regions.is_empty() {
            return Err(StreamError::UnbalancedMarkedContent(
                "BDC without matching EMC at end of stream",
            ));
        }

        Ok(StreamOutcome {
            output: self.out,
            containers: self.containers,
        })
    }

    /// Current marked-content suppression depth.
    pub fn mc_balance(&self) -> usize {
        self.mc_balance
    }

    fn dispatch(&mut self, op: &Operator, operands: &[PdfObject]) -> Result<()> {
        match op_class(op) {
            OpClass::MarkedContent => {
                return match op {
                    Operator::BDC => self.do_bdc(operands, true),
                    Operator::BMC => self.do_bdc(operands, false),
                    Operator::EMC => self.do_emc(operands),
                    _ => unreachable!(),
                };
            }
            OpClass::XObject => return self.do_xobject(operands),
            // Stray ID/EI outside a BI context carry no meaning
            OpClass::InlineImage => return Ok(()),
            OpClass::GraphicsState => self.update_graphics_state(op, operands),
            OpClass::TextState => self.update_text_state(op, operands),
            OpClass::TextShow => self.accumulate_text(op, operands),
            OpClass::Path | OpClass::Color | OpClass::TextPosition | OpClass::Unknown => {}
        }

        if self.mc_balance == 0 {
            write_operator_line(operands, op, &mut self.out);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Marked content
    // ------------------------------------------------------------------

    fn do_bdc(&mut self, operands: &[PdfObject], has_props: bool) -> Result<()> {
        // Nested content of an already-removed region is never inspected
        if self.mc_balance > 0 {
            self.mc_balance += 1;
            return Ok(());
        }

        let info = self.marked_content_info(operands, has_props)?;
        let (kind, layer_name) = self.classify(&info);
        let container = RemovablePageContainer::new(kind, layer_name, info.mcid);

        let matched = self
            .filter
            .is_some_and(|f| f.matches(self.container_index, container.kind, &container.layer_name));
        self.open_regions.push(container);

        if matched {
            self.mc_balance = 1;
        } else {
            let op = if has_props {
                Operator::BDC
            } else {
                Operator::BMC
            };
            write_operator_line(operands, &op, &mut self.out);
        }
        Ok(())
    }

    fn do_emc(&mut self, operands: &[PdfObject]) -> Result<()> {
        let was_suppressed = self.mc_balance > 0;
        if self.mc_balance > 1 {
            self.mc_balance -= 1;
        } else {
            self.mc_balance = 0;
            let region = self.open_regions.pop().ok_or(
                StreamError::UnbalancedMarkedContent("EMC without matching BDC"),
            )?;
            self.containers.push((self.container_index, region));
        }
        self.container_index += 1;

        if !was_suppressed {
            write_operator_line(operands, &Operator::EMC, &mut self.out);
        }
        Ok(())
    }

    fn marked_content_info(
        &self,
        operands: &[PdfObject],
        has_props: bool,
    ) -> Result<MarkedContentInfo> {
        let tag = operands
            .first()
            .and_then(|o| o.as_name().ok())
            .unwrap_or_default()
            .to_string();

        let mut properties = Dict::new();
        let mut property_name = None;
        if has_props {
            match operands.get(1) {
                Some(PdfObject::Dict(dict)) => properties = dict.clone(),
                Some(PdfObject::Name(name)) => {
                    property_name = Some(name.clone());
                    if let Some(entry) = self.resources.properties.get(name) {
                        if let Ok(PdfObject::Dict(dict)) = self.resolver.resolve_object(entry) {
                            properties = dict;
                        }
                    }
                }
                _ => {}
            }
        }

        let mcid = properties.get("MCID").and_then(|o| o.as_int().ok());

        Ok(MarkedContentInfo {
            tag,
            properties,
            property_name,
            mcid,
        })
    }

    fn classify(&self, info: &MarkedContentInfo) -> (ContainerKind, String) {
        match info.tag.as_str() {
            "OC" => {
                // The OCG dictionary's /Name string is the layer name
                let name = info
                    .properties
                    .get("Name")
                    .and_then(|o| match o {
                        PdfObject::String { bytes, .. } => {
                            Some(String::from_utf8_lossy(bytes).into_owned())
                        }
                        PdfObject::Name(n) => Some(n.clone()),
                        _ => None,
                    })
                    .or_else(|| info.property_name.clone())
                    .unwrap_or_default();
                (ContainerKind::Oc, name)
            }
            "Artifact" => {
                let name = info
                    .properties
                    .get("Subtype")
                    .and_then(|o| o.as_name().ok())
                    .unwrap_or_default()
                    .to_string();
                (ContainerKind::Artifact, name)
            }
            tag => (ContainerKind::Other, tag.to_string()),
        }
    }

    // ------------------------------------------------------------------
    // XObjects and inline images
    // ------------------------------------------------------------------

    fn do_xobject(&mut self, operands: &[PdfObject]) -> Result<()> {
        let name = operands
            .last()
            .and_then(|o| o.as_name().ok())
            .map(str::to_string);

        if let Some(name) = &name {
            // An excluded XObject is dropped before region accumulation
            if self.xobjects_to_remove.contains(name) {
                return Ok(());
            }
            if let Some(region) = self.open_regions.last_mut() {
                region.xobject_refs.push(name.clone());
            }
        }

        if self.mc_balance == 0 {
            write_operator_line(operands, &Operator::Do, &mut self.out);
        }
        Ok(())
    }

    fn handle_inline_image(&mut self, image: &InlineImage) {
        if self.mc_balance == 0 {
            write_inline_image(image, &mut self.out);
            self.out.push(b'\n');
        }
    }

    // ------------------------------------------------------------------
    // Graphics and text state
    // ------------------------------------------------------------------

    fn update_graphics_state(&mut self, op: &Operator, operands: &[PdfObject]) {
        match op {
            Operator::Qq => self.gstack.push(self.gstate.clone()),
            Operator::Q => {
                if let Some(state) = self.gstack.pop() {
                    self.gstate = state;
                }
            }
            Operator::Cm => {
                if let Some(matrix) = matrix_operands(operands) {
                    self.gstate.ctm = mult_matrix(matrix, self.gstate.ctm);
                }
            }
            _ => {}
        }
    }

    fn update_text_state(&mut self, op: &Operator, operands: &[PdfObject]) {
        match op {
            Operator::Tc => {
                if let Some(v) = num_operand(operands) {
                    self.gstate.char_spacing = v;
                }
            }
            Operator::Tw => {
                if let Some(v) = num_operand(operands) {
                    self.gstate.word_spacing = v;
                }
            }
            Operator::Tz => {
                if let Some(v) = num_operand(operands) {
                    self.gstate.horiz_scaling = v;
                }
            }
            Operator::TL => {
                if let Some(v) = num_operand(operands) {
                    self.gstate.leading = v;
                }
            }
            Operator::Tf => {
                if operands.len() >= 2 {
                    if let Ok(name) = operands[operands.len() - 2].as_name() {
                        self.gstate.font = Some(name.to_string());
                    }
                    if let Ok(size) = operands[operands.len() - 1].as_num() {
                        self.gstate.font_size = size;
                    }
                }
            }
            Operator::Tr => {
                if let Some(v) = num_operand(operands) {
                    self.gstate.render_mode = v as i32;
                }
            }
            Operator::Ts => {
                if let Some(v) = num_operand(operands) {
                    self.gstate.rise = v;
                }
            }
            _ => {}
        }
    }

    fn accumulate_text(&mut self, op: &Operator, operands: &[PdfObject]) {
        let Some(region) = self.open_regions.last_mut() else {
            return;
        };
        match op {
            Operator::Tj | Operator::Quote | Operator::DoubleQuote => {
                if let Some(PdfObject::String { bytes, .. }) = operands.last() {
                    region.text.push_str(&String::from_utf8_lossy(bytes));
                }
            }
            Operator::TJ => {
                if let Some(PdfObject::Array(items)) = operands.last() {
                    for item in items {
                        if let PdfObject::String { bytes, .. } = item {
                            region.text.push_str(&String::from_utf8_lossy(bytes));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Current graphics state (read-only).
    pub fn graphics_state(&self) -> &GraphicsState {
        &self.gstate
    }
}

fn num_operand(operands: &[PdfObject]) -> Option<f64> {
    operands.last().and_then(|o| o.as_num().ok())
}

fn matrix_operands(operands: &[PdfObject]) -> Option<(f64, f64, f64, f64, f64, f64)> {
    if operands.len() < 6 {
        return None;
    }
    let tail = &operands[operands.len() - 6..];
    let mut nums = [0.0; 6];
    for (slot, obj) in nums.iter_mut().zip(tail) {
        *slot = obj.as_num().ok()?;
    }
    Some((nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]))
}

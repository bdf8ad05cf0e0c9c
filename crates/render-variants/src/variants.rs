//! Render-format option records.
//!
//! Each render format has one option record ("device info"). Every option is
//! carried as text, numeric, boolean and date-like ones included; the
//! renderer on the other side of the wire parses them. An unset option is
//! `None`, which the parameter map leaves out.
//!
//! The set of formats is closed: adding one means adding a case to the
//! `device_infos!` invocation below.

use std::fmt;
use std::str::FromStr;

/// How a variant property can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Writable text option
    Text,
    /// Read-only format discriminator
    Discriminator,
}

/// Declared property of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
}

/// Name under which every variant exposes its discriminator.
pub const DISCRIMINATOR_PROPERTY: &str = "RenderFormat";

impl PropertySpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::Text,
        }
    }

    pub const fn discriminator() -> Self {
        Self {
            name: DISCRIMINATOR_PROPERTY,
            kind: PropertyKind::Discriminator,
        }
    }

    /// Name of the property's value type, as reported in binding errors.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            PropertyKind::Text => "string",
            PropertyKind::Discriminator => "RenderFormat",
        }
    }
}

/// Options record of a single render format.
pub trait DeviceInfo: fmt::Debug {
    /// The format this record configures.
    fn format(&self) -> RenderFormat;

    fn type_name(&self) -> &'static str;

    /// All properties in declaration order, discriminator first.
    fn properties(&self) -> &'static [PropertySpec];

    /// Current value of an option by its exact declared name.
    fn option(&self, name: &str) -> Option<&str>;

    /// Storage slot of an option by its exact declared name.
    fn option_mut(&mut self, name: &str) -> Option<&mut Option<String>>;

    fn discriminator(&self) -> &'static str {
        self.format().discriminator()
    }
}

macro_rules! device_infos {
    (@default) => { None };
    (@default $default:literal) => { Some($default.to_string()) };

    ($(
        $(#[$meta:meta])*
        $variant:ident($ty:ident) = $disc:literal {
            $($field:ident : $option:literal $(= $default:literal)?),* $(,)?
        }
    )*) => {
        /// Every supported render format.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RenderFormat {
            $($variant,)*
        }

        impl RenderFormat {
            /// All formats, in registration order.
            pub const ALL: &'static [RenderFormat] = &[$(RenderFormat::$variant,)*];

            /// Format name as used by the report server, e.g. `PDF`.
            pub fn discriminator(&self) -> &'static str {
                match self {
                    $(RenderFormat::$variant => $disc,)*
                }
            }

            /// A fresh options record with built-in defaults.
            pub fn instantiate(&self) -> RenderVariant {
                match self {
                    $(RenderFormat::$variant => RenderVariant::$variant($ty::default()),)*
                }
            }
        }

        /// Options record of any format.
        #[derive(Debug, Clone, PartialEq)]
        pub enum RenderVariant {
            $($variant($ty),)*
        }

        impl RenderVariant {
            fn inner(&self) -> &dyn DeviceInfo {
                match self {
                    $(RenderVariant::$variant(v) => v,)*
                }
            }

            fn inner_mut(&mut self) -> &mut dyn DeviceInfo {
                match self {
                    $(RenderVariant::$variant(v) => v,)*
                }
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            pub struct $ty {
                $(pub $field: Option<String>,)*
            }

            impl Default for $ty {
                fn default() -> Self {
                    Self {
                        $($field: device_infos!(@default $($default)?),)*
                    }
                }
            }

            impl $ty {
                pub const PROPERTIES: &'static [PropertySpec] = &[
                    PropertySpec::discriminator(),
                    $(PropertySpec::text($option),)*
                ];
            }

            impl DeviceInfo for $ty {
                fn format(&self) -> RenderFormat {
                    RenderFormat::$variant
                }

                fn type_name(&self) -> &'static str {
                    stringify!($ty)
                }

                fn properties(&self) -> &'static [PropertySpec] {
                    Self::PROPERTIES
                }

                fn option(&self, name: &str) -> Option<&str> {
                    match name {
                        $($option => self.$field.as_deref(),)*
                        _ => None,
                    }
                }

                fn option_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
                    match name {
                        $($option => Some(&mut self.$field),)*
                        _ => None,
                    }
                }
            }
        )*
    };
}

device_infos! {
    /// Adobe PDF renderer.
    Pdf(PdfDeviceInfo) = "PDF" {
        columns: "Columns",
        column_spacing: "ColumnSpacing",
        dpi_x: "DpiX",
        dpi_y: "DpiY",
        end_page: "EndPage",
        human_readable_pdf: "HumanReadablePDF" = "false",
        margin_bottom: "MarginBottom",
        margin_left: "MarginLeft",
        margin_right: "MarginRight",
        margin_top: "MarginTop",
        page_height: "PageHeight",
        page_width: "PageWidth",
        start_page: "StartPage",
    }

    /// Raster image renderer (TIFF, PNG, EMF, ...).
    Image(ImageDeviceInfo) = "IMAGE" {
        columns: "Columns",
        column_spacing: "ColumnSpacing",
        dpi_x: "DpiX",
        dpi_y: "DpiY",
        end_page: "EndPage",
        margin_bottom: "MarginBottom",
        margin_left: "MarginLeft",
        margin_right: "MarginRight",
        margin_top: "MarginTop",
        output_format: "OutputFormat" = "TIFF",
        page_height: "PageHeight",
        page_width: "PageWidth",
        print_dpi_x: "PrintDpiX",
        print_dpi_y: "PrintDpiY",
        start_page: "StartPage",
    }

    /// Comma-separated data renderer.
    Csv(CsvDeviceInfo) = "CSV" {
        encoding: "Encoding",
        excel_mode: "ExcelMode" = "true",
        field_delimiter: "FieldDelimiter" = ",",
        file_extension: "FileExtension",
        no_header: "NoHeader" = "false",
        qualifier: "Qualifier",
        record_delimiter: "RecordDelimiter",
        suppress_line_breaks: "SuppressLineBreaks",
        use_formatted_values: "UseFormattedValues",
    }

    /// XML data renderer.
    Xml(XmlDeviceInfo) = "XML" {
        encoding: "Encoding",
        file_extension: "FileExtension",
        indented: "Indented",
        mime_type: "MIMEType",
        omit_schema: "OmitSchema",
        schema: "Schema",
        use_formatted_values: "UseFormattedValues",
        xslt: "XSLT",
    }

    /// Atom data feed renderer.
    Atom(AtomDeviceInfo) = "ATOM" {
        data_feed: "DataFeed",
        encoding: "Encoding",
    }

    /// Excel 97-2003 renderer.
    Excel(ExcelDeviceInfo) = "EXCEL" {
        omit_document_map: "OmitDocumentMap",
        omit_formulas: "OmitFormulas",
        remove_space: "RemoveSpace",
        simple_page_headers: "SimplePageHeaders",
        suppress_outlines: "SuppressOutlines",
    }

    /// Excel Open XML renderer.
    ExcelOpenXml(ExcelOpenXmlDeviceInfo) = "EXCELOPENXML" {
        omit_document_map: "OmitDocumentMap",
        omit_formulas: "OmitFormulas",
        simple_page_headers: "SimplePageHeaders",
    }

    /// Word 97-2003 renderer.
    Word(WordDeviceInfo) = "WORD" {
        auto_fit: "AutoFit",
        expand_toggles: "ExpandToggles",
        fixed_page_width: "FixedPageWidth",
        omit_hyperlinks: "OmitHyperlinks",
        omit_drillthroughs: "OmitDrillthroughs",
    }

    /// Word Open XML renderer.
    WordOpenXml(WordOpenXmlDeviceInfo) = "WORDOPENXML" {
        auto_fit: "AutoFit",
        expand_toggles: "ExpandToggles",
        fixed_page_width: "FixedPageWidth",
        omit_hyperlinks: "OmitHyperlinks",
        omit_drillthroughs: "OmitDrillthroughs",
    }

    /// PowerPoint renderer.
    Pptx(PptxDeviceInfo) = "PPTX" {
        end_page: "EndPage",
        start_page: "StartPage",
        use_report_page_size: "UseReportPageSize",
    }

    /// HTML 4.0 renderer.
    Html40(Html40DeviceInfo) = "HTML4.0" {
        bookmark_id: "BookmarkID",
        doc_map: "DocMap",
        expand_content: "ExpandContent",
        find_string: "FindString",
        html_fragment: "HTMLFragment",
        image_consolidation: "ImageConsolidation",
        java_script: "JavaScript",
        link_target: "LinkTarget",
        only_visible_styles: "OnlyVisibleStyles",
        parameters: "Parameters",
        prefix_id: "PrefixId",
        section: "Section",
        stream_root: "StreamRoot",
        style_stream: "StyleStream",
        toolbar: "Toolbar" = "true",
        zoom: "Zoom",
    }

    /// HTML5 renderer.
    Html5(Html5DeviceInfo) = "HTML5" {
        bookmark_id: "BookmarkID",
        doc_map: "DocMap",
        expand_content: "ExpandContent",
        find_string: "FindString",
        html_fragment: "HTMLFragment",
        image_consolidation: "ImageConsolidation",
        java_script: "JavaScript",
        link_target: "LinkTarget",
        only_visible_styles: "OnlyVisibleStyles",
        parameters: "Parameters",
        prefix_id: "PrefixId",
        section: "Section",
        stream_root: "StreamRoot",
        style_stream: "StyleStream",
        toolbar: "Toolbar" = "true",
        zoom: "Zoom",
    }

    /// MIME-encapsulated web archive renderer.
    Mhtml(MhtmlDeviceInfo) = "MHTML" {
        java_script: "JavaScript",
        mhtml_fragment: "MHTMLFragment",
        outlook_compat: "OutlookCompat",
    }

    /// Renders nothing; used to time report processing alone.
    Null(NullDeviceInfo) = "NULL" {}
}

impl DeviceInfo for RenderVariant {
    fn format(&self) -> RenderFormat {
        self.inner().format()
    }

    fn type_name(&self) -> &'static str {
        self.inner().type_name()
    }

    fn properties(&self) -> &'static [PropertySpec] {
        self.inner().properties()
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.inner().option(name)
    }

    fn option_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        self.inner_mut().option_mut(name)
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.discriminator())
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderFormat::ALL
            .iter()
            .copied()
            .find(|f| f.discriminator().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown render format: {s}"))
    }
}

//! MCP tool-call helpers: function-name parsing and result normalization.
//!
//! Both halves are pure and total.  They accept whatever the agent event
//! stream hands over and always produce something displayable.

pub mod function;
pub mod result;

pub use function::{ParsedFunction, ServerAlias, is_mcp_function, parse_tool_function_name};
pub use result::{
    DEFAULT_MAX_DECODE_DEPTH, LinkItem, NormalizedResult, ResultNormalizer, normalize,
    render_text,
};

//! MCP tool definitions and registry
//!
//! This module defines the available MCP tools and their implementations:
//! argument validation, the store fetch, and rendering of the analytics
//! reports returned as tool output.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::analytics::{self, StepSummary};
use crate::error::{Error, ProtocolError, Result};
use crate::mcp::types::{McpToolDefinition, ToolCallResult};
use crate::store::StepStore;

/// A registered MCP tool
pub trait McpTool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str;
    /// Tool description
    fn description(&self) -> &str;
    /// Input schema as JSON
    fn input_schema(&self) -> Value;
    /// Get tool definition
    fn definition(&self) -> McpToolDefinition {
        McpToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool registry holding all available tools
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
    store: Arc<dyn StepStore>,
}

impl ToolRegistry {
    /// Create a new tool registry with all built-in tools
    pub fn new(store: Arc<dyn StepStore>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
            store,
        };

        // Register all built-in tools
        registry.register(Box::new(GetStepSummaryTool));
        registry.register(Box::new(GetActivityPatternsTool));

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<McpToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Execute a tool by name
    #[instrument(skip(self, args))]
    pub async fn execute(&self, name: &str, args: Value) -> Result<ToolCallResult> {
        info!("Executing tool: {}", name);

        if !self.tools.contains_key(name) {
            return Err(ProtocolError::ToolNotFound(name.to_string()).into());
        }

        match name {
            "get_step_summary" => self.execute_step_summary(args).await,
            "get_activity_patterns" => self.execute_activity_patterns(args).await,
            _ => Err(ProtocolError::ToolNotFound(name.to_string()).into()),
        }
    }

    async fn execute_step_summary(&self, args: Value) -> Result<ToolCallResult> {
        let start = require_date(&args, "startDate")?;
        let end = require_date(&args, "endDate")?;

        let summary = self.fetch_summary(start, end).await?;
        Ok(ToolCallResult::text(render_step_summary(
            &summary, start, end,
        )))
    }

    async fn execute_activity_patterns(&self, args: Value) -> Result<ToolCallResult> {
        let days = analytics::normalized_window_days(args.get("days").and_then(Value::as_i64));
        let (start, end) = analytics::recent_window(days);

        let summary = self.fetch_summary(start, end).await?;
        Ok(ToolCallResult::text(render_activity_patterns(
            &summary, days,
        )))
    }

    async fn fetch_summary(&self, start: NaiveDate, end: NaiveDate) -> Result<StepSummary> {
        let records = self.store.fetch_step_records(start, end).await?;
        Ok(analytics::summarize(&records))
    }
}

fn require_date(args: &Value, name: &str) -> Result<NaiveDate> {
    let raw = args
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::generic(format!("Missing required parameter: {name}")))?;
    raw.parse()
        .map_err(|_| Error::generic(format!("Invalid date for {name}: {raw}")))
}

fn render_step_summary(summary: &StepSummary, start: NaiveDate, end: NaiveDate) -> String {
    let weekly_pattern = summary
        .weekly_pattern
        .iter()
        .map(|(day, avg)| format!("- {day}: {} steps (average)", format_count(*avg)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "**Step Count Analysis ({start} to {end})**\n\n\
         📊 **Overall Statistics:**\n\
         - Total Steps: {total}\n\
         - Average Daily Steps: {average}\n\n\
         🏆 **Most Active Day:** {most_date} with {most_steps} steps\n\
         😴 **Least Active Day:** {least_date} with {least_steps} steps\n\n\
         📅 **Weekly Activity Pattern:**\n\
         {weekly_pattern}\n\n\
         📈 **Daily Data:** {tracked} days of step data included",
        total = format_count(summary.total_steps),
        average = format_count(summary.average_steps),
        most_date = summary.most_active_day.date,
        most_steps = format_count(summary.most_active_day.steps),
        least_date = summary.least_active_day.date,
        least_steps = format_count(summary.least_active_day.steps),
        tracked = summary.daily_data.len(),
    )
}

fn render_activity_patterns(summary: &StepSummary, days: i64) -> String {
    let mut by_average: Vec<(&str, u64)> = summary
        .weekly_pattern
        .iter()
        .map(|(day, avg)| (day.as_str(), *avg))
        .collect();

    by_average.sort_by(|a, b| b.1.cmp(&a.1));
    let (most_day, most_avg) = by_average.first().copied().unwrap_or(("none", 0));

    by_average.sort_by(|a, b| a.1.cmp(&b.1));
    let (least_day, least_avg) = by_average.first().copied().unwrap_or(("none", 0));

    format!(
        "**{days}-Day Activity Pattern Analysis**\n\n\
         🎯 **Key Insights:**\n\
         - Most Active Day of Week: {most_day} ({most_avg} avg steps)\n\
         - Least Active Day of Week: {least_day} ({least_avg} avg steps)\n\n\
         📊 **{days}-Day Highlights:**\n\
         - Highest Step Day: {high_date} ({high_steps} steps)\n\
         - Lowest Step Day: {low_date} ({low_steps} steps)\n\
         - Daily Average: {average} steps",
        most_avg = format_count(most_avg),
        least_avg = format_count(least_avg),
        high_date = summary.most_active_day.date,
        high_steps = format_count(summary.most_active_day.steps),
        low_date = summary.least_active_day.date,
        low_steps = format_count(summary.least_active_day.steps),
        average = format_count(summary.average_steps),
    )
}

/// Format a count with thousands separators, `9000` becomes `9,000`.
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Date-range step analytics
struct GetStepSummaryTool;

impl McpTool for GetStepSummaryTool {
    fn name(&self) -> &str {
        "get_step_summary"
    }

    fn description(&self) -> &str {
        "Get detailed step count analytics including most/least active days, weekly patterns for existing step data"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "startDate": { "type": "string", "format": "date" },
                "endDate": { "type": "string", "format": "date" }
            },
            "required": ["startDate", "endDate"]
        })
    }
}

/// Recent-window activity patterns
struct GetActivityPatternsTool;

impl McpTool for GetActivityPatternsTool {
    fn name(&self) -> &str {
        "get_activity_patterns"
    }

    fn description(&self) -> &str {
        "Get activity patterns for the last 30 days including most/least active days of the week"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "days": { "type": "number", "default": 30 }
            },
            "required": []
        })
    }
}

/// List of all available tools (for documentation)
pub const AVAILABLE_TOOLS: &[&str] = &["get_step_summary", "get_activity_patterns"];

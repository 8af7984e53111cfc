//! Cost section of a project feasibility study.

use tracing::{debug, instrument, warn};

use super::cache::{keys, RedisCache};
use super::sanitize::parse_or;
use super::AiClient;
use crate::domain::{
    CostDataSource, FinancialProjection, ProjectCostSplit, ProjectStudyCosts, ProjectStudyInput,
    SplitSource, DEFAULT_INVESTMENT,
};
use crate::estimator::{CostEstimateResult, CostEstimator};

pub struct ProjectStudyPlanner<'a> {
    estimator: &'a CostEstimator,
    ai_client: Option<&'a AiClient>,
    cache: Option<&'a RedisCache>,
}

impl<'a> ProjectStudyPlanner<'a> {
    pub fn new(
        estimator: &'a CostEstimator,
        ai_client: Option<&'a AiClient>,
        cache: Option<&'a RedisCache>,
    ) -> Self {
        Self {
            estimator,
            ai_client,
            cache,
        }
    }

    #[instrument(skip_all, fields(project_type = %input.project_type, location = %input.location))]
    pub async fn costs(
        &self,
        input: &ProjectStudyInput,
        request_id: Option<&str>,
    ) -> ProjectStudyCosts {
        let (cost_estimate, investment, cost_data_source) =
            match self.estimator.estimate(&input.to_cost_input()) {
                Ok(result) => {
                    let total = result.total_cost;
                    (Some(result), total, CostDataSource::Engine)
                }
                Err(e) => {
                    warn!(error = %e, "Estimator failed, using default investment");
                    (None, DEFAULT_INVESTMENT, CostDataSource::Default)
                }
            };

        let (cost_split, split_source) = match self
            .ai_split(input, investment, cost_estimate.as_ref(), request_id)
            .await
        {
            Some(split) => (split, SplitSource::Ai),
            None => (ProjectCostSplit::fallback(investment), SplitSource::Fallback),
        };

        ProjectStudyCosts {
            project_name: input.project_name.clone(),
            project_type: input.project_type.clone(),
            location: input.location.clone(),
            cost_estimate,
            investment_amount: investment,
            cost_data_source,
            cost_split,
            split_source,
            financial_projection: FinancialProjection::from_investment(investment),
        }
    }

    async fn ai_split(
        &self,
        input: &ProjectStudyInput,
        investment: f64,
        estimate: Option<&CostEstimateResult>,
        request_id: Option<&str>,
    ) -> Option<ProjectCostSplit> {
        let client = self.ai_client?;
        let cache_key = keys::study_split(&fingerprint(input, investment, client.model()));

        if let Some(cache) = self.cache {
            if let Some(split) = cache.get::<ProjectCostSplit>(&cache_key).await {
                return Some(split);
            }
        }

        let prompt = split_prompt(input, investment, estimate);
        let reply = match client.complete(&prompt, request_id).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "AI cost split unavailable, using fallback");
                return None;
            }
        };

        let split = parse_split(&reply)?;

        if let Some(cache) = self.cache {
            if let Err(e) = cache.set(&cache_key, &split).await {
                warn!(error = %e, "Failed to cache AI cost split");
            }
        }

        debug!(total = split.total_project_cost, "AI cost split accepted");
        Some(split)
    }
}

/// A usable split from a model reply, or `None` when the reply is unreadable
/// or implausible.
fn parse_split(reply: &str) -> Option<ProjectCostSplit> {
    match parse_or::<Option<ProjectCostSplit>>(reply, None) {
        Some(split) if split.is_plausible() => Some(split),
        Some(_) => {
            warn!("AI cost split failed plausibility check, using fallback");
            None
        }
        None => None,
    }
}

fn fingerprint(input: &ProjectStudyInput, investment: f64, model: &str) -> String {
    format!(
        "{}:{}:{}:{}:{:.0}:{}",
        model,
        input.project_type,
        input.location,
        input.finishing_level,
        investment,
        input.total_area
    )
}

fn split_prompt(
    input: &ProjectStudyInput,
    investment: f64,
    estimate: Option<&CostEstimateResult>,
) -> String {
    let context = estimate
        .map(|e| {
            format!(
                "\n\nالتكاليف المحسوبة من قسم الميزانية:\n\
                 - إجمالي تكلفة البناء: {:.0} ريال\n\
                 - تكلفة المتر المربع: {:.0} ريال/م²\n\
                 - الهيكل الإنشائي: {:.0} ريال\n\
                 - التشطيبات: {:.0} ريال\n\
                 - الكهرباء: {:.0} ريال\n\
                 - السباكة: {:.0} ريال\n\
                 - التكييف: {:.0} ريال\n\
                 - التراخيص: {:.0} ريال",
                e.total_cost,
                e.cost_per_square_meter,
                e.structural_cost,
                e.finishing_cost,
                e.electrical_cost,
                e.plumbing_cost,
                e.hvac_cost,
                e.permits_cost,
            )
        })
        .unwrap_or_default();

    format!(
        "تفصيل دقيق للتكاليف لمشروع {} في {} بقيمة {:.0} ريال ومساحة {} متر مربع.{}\n\n\
         أرجع كائن JSON بالمفاتيح التالية وقيم رقمية بالريال: landCost, constructionCost, \
         infrastructureCost, permitsAndLicenses, marketingCost, contingency, totalProjectCost.\n\n\
         مهم: أرجع JSON صالح فقط.",
        input.project_type, input.location, investment, input.total_area, context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectStudyRequest;
    use serde_json::json;

    fn study(project_type: &str, total_area: f64) -> ProjectStudyInput {
        serde_json::from_value::<ProjectStudyRequest>(json!({
            "projectName": "مشروع الواحة",
            "projectType": project_type,
            "location": "الملقا",
            "totalArea": total_area,
            "finishingLevel": "متوسط"
        }))
        .unwrap()
        .into_input()
        .unwrap()
    }

    #[tokio::test]
    async fn without_ai_uses_engine_total_and_fallback_split() {
        let estimator = CostEstimator::default();
        let planner = ProjectStudyPlanner::new(&estimator, None, None);

        let costs = planner.costs(&study("residential_complex", 2000.0), None).await;

        let estimate = costs.cost_estimate.as_ref().unwrap();
        assert_eq!(costs.cost_data_source, CostDataSource::Engine);
        assert_eq!(costs.split_source, SplitSource::Fallback);
        assert_eq!(costs.investment_amount, estimate.total_cost);
        assert!((costs.cost_split.components_total() - costs.investment_amount).abs() < 1e-6);
        assert_eq!(costs.financial_projection.total_cost, costs.investment_amount);
    }

    #[test]
    fn prompt_embeds_engine_figures() {
        let input = study("commercial_mall", 3000.0);
        let estimate = CostEstimator::default()
            .estimate(&input.to_cost_input())
            .unwrap();

        let prompt = split_prompt(&input, estimate.total_cost, Some(&estimate));
        assert!(prompt.contains(&format!("{:.0}", estimate.structural_cost)));
        assert!(prompt.contains("totalProjectCost"));

        let bare = split_prompt(&input, DEFAULT_INVESTMENT, None);
        assert!(!bare.contains("قسم الميزانية"));
        assert!(bare.contains("5000000"));
    }

    #[test]
    fn split_replies_are_parsed_leniently() {
        let reply = "```json\n{\n  \"landCost\": 250, // land\n  \"constructionCost\": 500,\n  \"infrastructureCost\": 120,\n  \"permitsAndLicenses\": 40,\n  \"marketingCost\": 60,\n  \"contingency\": 30,\n  \"totalProjectCost\": 1000\n}\n```";

        let split = parse_split(reply).unwrap();
        assert_eq!(split.land_cost, 250.0);
        assert_eq!(split.total_project_cost, 1000.0);
    }

    #[test]
    fn unusable_split_replies_yield_none() {
        assert_eq!(parse_split("لا أستطيع المساعدة"), None);
        assert_eq!(parse_split("{\"landCost\": 250}"), None);

        let mut negative = ProjectCostSplit::fallback(1000.0);
        negative.marketing_cost = -5.0;
        let reply = serde_json::to_string(&negative).unwrap();
        assert_eq!(parse_split(&reply), None);
    }

    #[test]
    fn fingerprint_distinguishes_inputs() {
        let a = fingerprint(&study("commercial_mall", 3000.0), 1.0, "m");
        let b = fingerprint(&study("commercial_mall", 3100.0), 1.0, "m");
        assert_ne!(a, b);
    }
}

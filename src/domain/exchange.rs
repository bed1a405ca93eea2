// ==========================================
// 查找表文本导入 - 交换文档
// ==========================================
// 结构: Exchange → 租户 → 法规 → 查找表
// 租户与法规仅做标识（NoUpdate），查找表携带切片的更新模式
// ==========================================

use crate::domain::lookup::LookupSet;
use crate::domain::types::UpdateMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRegulation {
    pub name: String,
    pub update_mode: UpdateMode,
    pub lookups: Vec<LookupSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeTenant {
    pub identifier: String,
    pub update_mode: UpdateMode,
    pub regulations: Vec<ExchangeRegulation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub tenants: Vec<ExchangeTenant>,
}

impl Exchange {
    /// 构建单租户、单法规、单查找表的最小交换文档
    pub fn for_lookup(tenant: &str, regulation: &str, lookup: LookupSet) -> Self {
        Self {
            tenants: vec![ExchangeTenant {
                identifier: tenant.to_string(),
                update_mode: UpdateMode::NoUpdate,
                regulations: vec![ExchangeRegulation {
                    name: regulation.to_string(),
                    update_mode: UpdateMode::NoUpdate,
                    lookups: vec![lookup],
                }],
            }],
        }
    }

    /// 遍历文档内所有 (租户, 法规, 查找表)
    pub fn lookups(
        &self,
    ) -> impl Iterator<Item = (&ExchangeTenant, &ExchangeRegulation, &LookupSet)> {
        self.tenants.iter().flat_map(|tenant| {
            tenant.regulations.iter().flat_map(move |regulation| {
                regulation
                    .lookups
                    .iter()
                    .map(move |lookup| (tenant, regulation, lookup))
            })
        })
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::transaction::{Action, FunctionCallAction};
use super::units::{Deposit, Gas};

/// A change call against a contract, in the shape operators write by hand:
/// `{contractId, methodName, args, gas, attachedDeposit}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallRequest {
    pub contract_id: String,
    pub method_name: String,
    pub args: Value,
    pub gas: Gas,
    pub attached_deposit: Deposit,
}

impl FunctionCallRequest {
    pub fn new(contract_id: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            method_name: method_name.into(),
            args: Value::Object(Default::default()),
            gas: Gas::MAX,
            attached_deposit: Deposit::ZERO,
        }
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    pub fn with_gas(mut self, gas: Gas) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_deposit(mut self, deposit: Deposit) -> Self {
        self.attached_deposit = deposit;
        self
    }

    pub fn to_action(&self) -> Result<Action, serde_json::Error> {
        Ok(Action::FunctionCall(FunctionCallAction {
            method_name: self.method_name.clone(),
            args: serde_json::to_vec(&self.args)?,
            gas: self.gas.as_u64(),
            deposit: self.attached_deposit.as_yocto(),
        }))
    }
}

/// A read-only call; never signed, never charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRequest {
    pub contract_id: String,
    pub method_name: String,
    pub args: Value,
}

impl ViewRequest {
    pub fn new(contract_id: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            method_name: method_name.into(),
            args: Value::Object(Default::default()),
        }
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remove_admin_payload_has_exact_fields() {
        let request = FunctionCallRequest::new("uon_staking_test_09.xuguangxia.testnet", "remove_admin")
            .with_args(json!({ "account_id": "dekatjauh.testnet" }))
            .with_gas("300000000000000".parse().unwrap())
            .with_deposit("0".parse().unwrap());

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contractId": "uon_staking_test_09.xuguangxia.testnet",
                "methodName": "remove_admin",
                "args": { "account_id": "dekatjauh.testnet" },
                "gas": "300000000000000",
                "attachedDeposit": "0",
            })
        );
    }

    #[test]
    fn test_defaults_are_max_gas_and_no_deposit() {
        let request = FunctionCallRequest::new("c.testnet", "claim_reward");
        assert_eq!(request.gas, Gas::MAX);
        assert_eq!(request.attached_deposit, Deposit::ZERO);
        assert_eq!(request.args, json!({}));
    }

    #[test]
    fn test_payload_parses_back_from_operator_json() {
        let request: FunctionCallRequest = serde_json::from_value(json!({
            "contractId": "ref-finance-101.testnet",
            "methodName": "mft_register",
            "args": { "account_id": "s.testnet", "token_id": ":382" },
            "gas": "300000000000000",
            "attachedDeposit": "1040000000000000000000",
        }))
        .unwrap();
        assert_eq!(request.attached_deposit.as_yocto(), 1_040_000_000_000_000_000_000);
        assert_eq!(request.args["token_id"], ":382");
    }

    #[test]
    fn test_action_carries_serialized_args() {
        let request = FunctionCallRequest::new("c.testnet", "add_admin")
            .with_args(json!({ "account_id": "pocktest.testnet" }))
            .with_deposit(Deposit::ONE_YOCTO);
        let Action::FunctionCall(action) = request.to_action().unwrap() else {
            panic!("expected a function call action");
        };
        assert_eq!(action.method_name, "add_admin");
        assert_eq!(action.args, br#"{"account_id":"pocktest.testnet"}"#.to_vec());
        assert_eq!(action.gas, 300_000_000_000_000);
        assert_eq!(action.deposit, 1);
    }
}

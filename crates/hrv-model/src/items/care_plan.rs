//! Care plans and the tasks and goals they track.

use super::RecordItem;
use crate::values::{ApproximateDateTime, CodableValue, PersonItem};
use hrv_types::{non_blank, optional_non_blank, ValidationResult};
use hrv_xml::{
    check_each, check_optional, optional_child, optional_text, read_collection, require,
    require_checked, require_text, required_child, required_text, Node, ReadXml, WriteXml, XmlResult, XmlWriter,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use uuid::Uuid;

/// One thing to do as part of a care plan. `<name>` is mandatory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CarePlanTask {
    pub name: Option<CodableValue>,
    description: Option<String>,
    pub start_date: Option<ApproximateDateTime>,
    pub end_date: Option<ApproximateDateTime>,
    pub target_completion_date: Option<ApproximateDateTime>,
    pub sequence_number: Option<i32>,
    reference_id: Option<String>,
}

impl CarePlanTask {
    pub fn new(name: CodableValue) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) -> ValidationResult<()> {
        self.description = optional_non_blank("description", description)?;
        Ok(())
    }

    pub fn set_reference_id(&mut self, reference_id: Option<String>) -> ValidationResult<()> {
        self.reference_id = optional_non_blank("reference-id", reference_id)?;
        Ok(())
    }
}

impl ReadXml for CarePlanTask {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            name: Some(required_child(node, "name")?),
            description: optional_text(node, "description")?,
            start_date: optional_child(node, "start-date")?,
            end_date: optional_child(node, "end-date")?,
            target_completion_date: optional_child(node, "target-completion-date")?,
            sequence_number: optional_text(node, "sequence-number")?,
            reference_id: optional_text(node, "reference-id")?,
        })
    }
}

impl WriteXml for CarePlanTask {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let name = require("name", &self.name)?;

        writer.start(element)?;
        writer.child("name", name)?;
        writer.optional_text("description", self.description.as_ref())?;
        writer.optional("start-date", self.start_date.as_ref())?;
        writer.optional("end-date", self.end_date.as_ref())?;
        writer.optional(
            "target-completion-date",
            self.target_completion_date.as_ref(),
        )?;
        writer.optional_text("sequence-number", self.sequence_number.as_ref())?;
        writer.optional_text("reference-id", self.reference_id.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("name", &self.name)?;
        check_optional(&self.start_date)?;
        check_optional(&self.end_date)?;
        check_optional(&self.target_completion_date)
    }
}

/// A desired outcome. `<name>` is mandatory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CarePlanGoal {
    pub name: Option<CodableValue>,
    description: Option<String>,
    pub start_date: Option<ApproximateDateTime>,
    pub end_date: Option<ApproximateDateTime>,
    pub target_completion_date: Option<ApproximateDateTime>,
    reference_id: Option<String>,
}

impl CarePlanGoal {
    pub fn new(name: CodableValue) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) -> ValidationResult<()> {
        self.description = optional_non_blank("description", description)?;
        Ok(())
    }

    pub fn set_reference_id(&mut self, reference_id: Option<String>) -> ValidationResult<()> {
        self.reference_id = optional_non_blank("reference-id", reference_id)?;
        Ok(())
    }
}

impl ReadXml for CarePlanGoal {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            name: Some(required_child(node, "name")?),
            description: optional_text(node, "description")?,
            start_date: optional_child(node, "start-date")?,
            end_date: optional_child(node, "end-date")?,
            target_completion_date: optional_child(node, "target-completion-date")?,
            reference_id: optional_text(node, "reference-id")?,
        })
    }
}

impl WriteXml for CarePlanGoal {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let name = require("name", &self.name)?;

        writer.start(element)?;
        writer.child("name", name)?;
        writer.optional_text("description", self.description.as_ref())?;
        writer.optional("start-date", self.start_date.as_ref())?;
        writer.optional("end-date", self.end_date.as_ref())?;
        writer.optional(
            "target-completion-date",
            self.target_completion_date.as_ref(),
        )?;
        writer.optional_text("reference-id", self.reference_id.as_ref())?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("name", &self.name)?;
        check_optional(&self.start_date)?;
        check_optional(&self.end_date)?;
        check_optional(&self.target_completion_date)
    }
}

/// Related goals grouped under a name: `<name>`, `<description>`, `<goals><goal>...`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CarePlanGoalGroup {
    pub name: Option<CodableValue>,
    description: Option<String>,
    pub goals: Vec<CarePlanGoal>,
}

impl CarePlanGoalGroup {
    pub fn new(name: CodableValue) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) -> ValidationResult<()> {
        self.description = optional_non_blank("description", description)?;
        Ok(())
    }
}

impl ReadXml for CarePlanGoalGroup {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            name: Some(required_child(node, "name")?),
            description: optional_text(node, "description")?,
            goals: read_collection(node, "goals/goal")?,
        })
    }
}

impl WriteXml for CarePlanGoalGroup {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.check_mandatory()?;
        let name = require("name", &self.name)?;

        writer.start(element)?;
        writer.child("name", name)?;
        writer.optional_text("description", self.description.as_ref())?;
        writer.collection("goals", &self.goals, "goal")?;
        writer.end(element)
    }

    fn check_mandatory(&self) -> XmlResult<()> {
        require_checked("name", &self.name)?;
        check_each(&self.goals)
    }
}

/// A plan of care: a named set of tasks and goal groups with the team responsible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CarePlan {
    name: String,
    pub start_date: Option<ApproximateDateTime>,
    pub end_date: Option<ApproximateDateTime>,
    pub status: Option<CodableValue>,
    pub care_team: Vec<PersonItem>,
    pub care_plan_manager: Option<PersonItem>,
    pub tasks: Vec<CarePlanTask>,
    pub goal_groups: Vec<CarePlanGoalGroup>,
}

impl CarePlan {
    pub fn new(name: impl Into<String>) -> ValidationResult<Self> {
        Ok(Self {
            name: non_blank("name", name)?,
            ..Self::default()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ValidationResult<()> {
        self.name = non_blank("name", name)?;
        Ok(())
    }
}

impl RecordItem for CarePlan {
    const TYPE_ID: Uuid = Uuid::from_u128(0x415c95e0_0533_4d9c_ac73_91dc5031186c);
    const TYPE_NAME: &'static str = "Care Plan";
    const ROOT_ELEMENT: &'static str = "care-plan";
}

impl fmt::Display for CarePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(status) = &self.status {
            write!(f, " [{status}]")?;
        }
        Ok(())
    }
}

impl ReadXml for CarePlan {
    fn read_xml(node: Node<'_, '_>) -> XmlResult<Self> {
        Ok(Self {
            name: required_text(node, "name")?,
            start_date: optional_child(node, "start-date")?,
            end_date: optional_child(node, "end-date")?,
            status: optional_child(node, "status")?,
            care_team: read_collection(node, "care-team/person")?,
            care_plan_manager: optional_child(node, "care-plan-manager")?,
            tasks: read_collection(node, "tasks/task")?,
            goal_groups: read_collection(node, "goal-groups/goal-group")?,
        })
    }
}

impl WriteXml for CarePlan {
    fn write_xml<W: Write>(&self, element: &str, writer: &mut XmlWriter<W>) -> XmlResult<()> {
        self.validate()?;

        writer.start(element)?;
        writer.element("name", &self.name)?;
        writer.optional("start-date", self.start_date.as_ref())?;
        writer.optional("end-date", self.end_date.as_ref())?;
        writer.optional("status", self.status.as_ref())?;
        writer.collection("care-team", &self.care_team, "person")?;
        writer.optional("care-plan-manager", self.care_plan_manager.as_ref())?;
        writer.collection("tasks", &self.tasks, "task")?;
        writer.collection("goal-groups", &self.goal_groups, "goal-group")?;
        writer.end(element)
    }

    /// Nested names are reported by their path from the plan.
    fn check_mandatory(&self) -> XmlResult<()> {
        require_text("name", &self.name)?;
        check_optional(&self.start_date)?;
        check_optional(&self.end_date)?;
        check_optional(&self.status)?;
        for person in &self.care_team {
            require("care-team/person/name", &person.name)?;
            person.check_mandatory()?;
        }
        check_optional(&self.care_plan_manager)?;
        for task in &self.tasks {
            require("tasks/task/name", &task.name)?;
            task.check_mandatory()?;
        }
        for group in &self.goal_groups {
            require("goal-groups/goal-group/name", &group.name)?;
            for goal in &group.goals {
                require("goal-groups/goal-group/goals/goal/name", &goal.name)?;
            }
            group.check_mandatory()?;
        }
        Ok(())
    }
}
